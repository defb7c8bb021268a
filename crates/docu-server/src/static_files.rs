//! Embedded stylesheet and sidebar script.

use axum::extract::Path;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Assets compiled into the binary: `(file name, content type, body)`.
const ASSETS: &[(&str, &str, &str)] = &[
    (
        "docu.css",
        "text/css; charset=utf-8",
        include_str!("../assets/docu.css"),
    ),
    (
        "sidebar.js",
        "text/javascript; charset=utf-8",
        include_str!("../assets/sidebar.js"),
    ),
];

/// Look up an embedded asset by file name.
fn get(file: &str) -> Option<(&'static str, &'static str)> {
    ASSETS
        .iter()
        .find(|(name, _, _)| *name == file)
        .map(|(_, mime, body)| (*mime, *body))
}

/// Handle GET /assets/{file}.
pub(crate) async fn serve_asset(Path(file): Path<String>) -> Response {
    match get(&file) {
        Some((mime, body)) => (
            [
                (header::CONTENT_TYPE, mime),
                (header::CACHE_CONTROL, "public, max-age=3600"),
            ],
            body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_assets() {
        let (mime, css) = get("docu.css").unwrap();
        assert_eq!(mime, "text/css; charset=utf-8");
        assert!(css.contains(".theme-admonition"));

        let (mime, js) = get("sidebar.js").unwrap();
        assert_eq!(mime, "text/javascript; charset=utf-8");
        assert!(js.contains("sb-sidenav-toggled"));
    }

    #[test]
    fn test_get_unknown_asset() {
        assert!(get("../Cargo.toml").is_none());
        assert!(get("app.js").is_none());
    }
}
