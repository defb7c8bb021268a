//! `docu render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use docu_renderer::{Pipeline, RenderOptions};
use docu_site::FrontMatter;

use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Document to render.
    file: PathBuf,

    /// Compile to an MDX component instead of HTML.
    #[arg(long)]
    mdx: bool,

    /// Disable syntax highlighting of code blocks.
    #[arg(long)]
    no_highlight: bool,

    /// Disable GitHub Flavored Markdown extensions.
    #[arg(long)]
    no_gfm: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or rendering fails.
    pub(crate) fn execute(&self) -> Result<(), CliError> {
        let rendered = self.render()?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;

        Ok(())
    }

    /// Render the document, skipping its front matter.
    fn render(&self) -> Result<String, CliError> {
        let content = std::fs::read_to_string(&self.file)?;
        let document = FrontMatter::parse(&content)?;

        let pipeline = self.pipeline();
        tracing::info!(
            file = %self.file.display(),
            stages = ?pipeline.stages(),
            "Rendering document"
        );

        Ok(pipeline.process(&document.body)?)
    }

    fn pipeline(&self) -> Pipeline {
        let options = RenderOptions {
            gfm: !self.no_gfm,
            highlight: !self.no_highlight,
        };
        if self.mdx {
            Pipeline::mdx(&options)
        } else {
            Pipeline::markdown(&options)
        }
    }
}
