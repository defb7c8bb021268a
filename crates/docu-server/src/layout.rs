//! Page chrome: sidebar menu, navbar and content container.

use std::fmt::Write;

use docu_renderer::escape_html;
use docu_site::MenuEntry;

/// Wrap rendered content in the full HTML page.
pub(crate) fn page(
    site_title: &str,
    page_title: Option<&str>,
    menu: &[MenuEntry],
    content: &str,
) -> String {
    let site_title = escape_html(site_title);
    let mut html = String::with_capacity(content.len() + 2048);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    match page_title {
        Some(title) => {
            writeln!(html, "<title>{} - {site_title}</title>", escape_html(title)).unwrap();
        }
        None => writeln!(html, "<title>{site_title}</title>").unwrap(),
    }
    html.push_str("<link rel=\"stylesheet\" href=\"/assets/docu.css\">\n");
    html.push_str("<script src=\"/assets/sidebar.js\" defer></script>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<div class=\"d-flex\" id=\"wrapper\">\n");
    html.push_str("<div class=\"border-end bg-white\" id=\"sidebar-wrapper\">\n");
    writeln!(
        html,
        "<div class=\"sidebar-heading border-bottom bg-light\">{site_title}</div>"
    )
    .unwrap();
    html.push_str("<div class=\"list-group list-group-flush\">\n");
    for entry in menu {
        writeln!(
            html,
            "<a class=\"list-group-item list-group-item-action list-group-item-light p-3\" href=\"/{}\">{}</a>",
            escape_html(&entry.href),
            escape_html(&entry.id)
        )
        .unwrap();
    }
    html.push_str("</div>\n</div>\n");

    html.push_str("<div id=\"page-content-wrapper\">\n");
    html.push_str("<nav class=\"navbar navbar-expand-lg navbar-light bg-light border-bottom\">\n");
    html.push_str("<div class=\"container-fluid\">\n");
    html.push_str("<button class=\"btn btn-primary\" id=\"sidebarToggle\">Toggle Menu</button>\n");
    html.push_str("</div>\n</nav>\n");
    html.push_str("<div class=\"container-fluid\">\n<div>\n");
    html.push_str(content);
    html.push_str("</div>\n</div>\n</div>\n</div>\n</body>\n</html>\n");

    html
}

/// Page shown when no document exists for a path.
pub(crate) fn not_found(site_title: &str, menu: &[MenuEntry]) -> String {
    page(
        site_title,
        Some("Not found"),
        menu,
        "<h1>404</h1>\n<p>This page could not be found.</p>\n",
    )
}
