//! Documentation site: content lookup, front matter and navigation.
//!
//! This crate provides:
//! - [`ContentResolver`]: request path to source file, with front matter split
//! - [`MenuBuilder`]: flat navigation menu from the content directory
//! - [`Site`]: both of the above plus the rendering pipelines
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use docu_site::{Site, SiteConfig};
//!
//! let site = Site::new(SiteConfig::default());
//! let page = site.render("guide/setup")?;
//! println!("{} menu entries, {} bytes of HTML", page.menu.len(), page.html.len());
//! # Ok(())
//! # }
//! ```

mod content;
mod error;
mod front_matter;
pub mod menu;

use std::path::PathBuf;
use std::time::SystemTime;

use docu_renderer::{Pipeline, RenderOptions};
use serde_json::{Map, Value};

pub use content::{ContentResolver, SourceDocument};
pub use error::SiteError;
pub use front_matter::FrontMatter;
pub use menu::{MenuBuilder, MenuEntry, MenuNode};

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Content root directory.
    pub source_dir: PathBuf,
    /// Document file extension, without the dot.
    pub extension: String,
    /// Pipeline options.
    pub render: RenderOptions,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(".doc"),
            extension: "md".to_owned(),
            render: RenderOptions::default(),
        }
    }
}

/// A rendered page with its navigation menu.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    /// Request path the page was rendered for.
    pub path: String,
    /// Rendered HTML body.
    pub html: String,
    /// Front matter metadata, passed through untouched.
    pub metadata: Map<String, Value>,
    /// Source file.
    pub source_path: PathBuf,
    /// Source file modification time.
    pub modified: Option<SystemTime>,
    /// Navigation menu for the whole site.
    pub menu: Vec<MenuEntry>,
}

/// A page compiled to an MDX component.
#[derive(Clone, Debug)]
pub struct CompiledComponent {
    /// JavaScript module source.
    pub code: String,
    /// Source file modification time.
    pub modified: Option<SystemTime>,
}

/// Documentation site rooted at a content directory.
///
/// Nothing is cached: every call reads the file system again.
#[derive(Debug)]
pub struct Site {
    resolver: ContentResolver,
    menu: MenuBuilder,
    markdown: Pipeline,
    mdx: Pipeline,
}

impl Site {
    /// Create a site.
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        Self {
            menu: MenuBuilder::new(&config.extension),
            resolver: ContentResolver::new(config.source_dir, config.extension),
            markdown: Pipeline::markdown(&config.render),
            mdx: Pipeline::mdx(&config.render),
        }
    }

    /// Build the navigation menu.
    pub fn menu(&self) -> Result<Vec<MenuEntry>, SiteError> {
        self.menu
            .build(self.resolver.root())
            .map_err(SiteError::Menu)
    }

    /// Render the page for a request path to HTML.
    pub fn render(&self, path: &str) -> Result<RenderedPage, SiteError> {
        let menu = self.menu()?;
        let document = self.resolver.load(path)?;
        let html = self.markdown.process(&document.front_matter.body)?;

        tracing::debug!(path, source = %document.path.display(), "Rendered page");

        Ok(RenderedPage {
            path: path.to_owned(),
            html,
            metadata: document.front_matter.metadata,
            source_path: document.path,
            modified: document.modified,
            menu,
        })
    }

    /// Compile the page for a request path to an MDX component.
    pub fn compile_component(&self, path: &str) -> Result<CompiledComponent, SiteError> {
        let document = self.resolver.load(path)?;
        let code = self.mdx.process(&document.front_matter.body)?;

        tracing::debug!(path, source = %document.path.display(), "Compiled component");

        Ok(CompiledComponent {
            code,
            modified: document.modified,
        })
    }
}
