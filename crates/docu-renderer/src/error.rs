//! Rendering errors.

/// Error produced by a pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// MDX compilation failed.
    #[error("MDX compilation failed: {0}")]
    Mdx(String),
    /// A compiler produced output that could not be assembled.
    #[error("{stage} failed: {message}")]
    Stage {
        stage: &'static str,
        message: String,
    },
}
