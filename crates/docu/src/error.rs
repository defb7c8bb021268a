//! CLI error types.

use docu_config::ConfigError;
use docu_site::SiteError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Render(#[from] docu_renderer::RenderError),

    #[error("{0}")]
    Server(String),
}
