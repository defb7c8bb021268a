//! Site errors.

use std::io;
use std::path::PathBuf;

use docu_renderer::RenderError;

/// Error returned when a page cannot be served.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No document exists for the request path.
    #[error("Page not found: {0}")]
    NotFound(String),
    /// I/O error reading a source file.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The content directory could not be walked.
    #[error("Failed to build menu: {0}")]
    Menu(#[source] io::Error),
    /// The front matter block is not a valid YAML mapping.
    #[error("Invalid front matter: {0}")]
    FrontMatter(String),
    /// A pipeline stage failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
