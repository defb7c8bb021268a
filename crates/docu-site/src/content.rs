//! Request path to source document.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::{FrontMatter, SiteError};

/// Page served for an empty request path.
const INDEX_PAGE: &str = "index";

/// A loaded source document.
#[derive(Clone, Debug)]
pub struct SourceDocument {
    /// File the document was read from.
    pub path: PathBuf,
    /// Front matter and body.
    pub front_matter: FrontMatter,
    /// File modification time, when the platform reports one.
    pub modified: Option<SystemTime>,
}

/// Maps request paths to files under a content root.
///
/// `guide/setup` resolves to `<root>/guide/setup.<extension>`.
#[derive(Clone, Debug)]
pub struct ContentResolver {
    root: PathBuf,
    extension: String,
}

impl ContentResolver {
    /// Create a resolver for `root`, serving files with `extension` (no dot).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a request path to a file path.
    ///
    /// Leading and trailing slashes are ignored and an empty path resolves
    /// to the index page. Segments that are empty, `.`, `..` or contain a
    /// backslash never resolve.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, SiteError> {
        let trimmed = path.trim_matches('/');
        let trimmed = if trimmed.is_empty() {
            INDEX_PAGE
        } else {
            trimmed
        };

        let mut file = self.root.clone();
        for segment in trimmed.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
                tracing::debug!(path, "Rejected request path");
                return Err(SiteError::NotFound(path.to_owned()));
            }
            file.push(segment);
        }

        let mut file_name = file.into_os_string();
        file_name.push(".");
        file_name.push(&self.extension);
        Ok(PathBuf::from(file_name))
    }

    /// Read the document for a request path and split its front matter.
    pub fn load(&self, path: &str) -> Result<SourceDocument, SiteError> {
        let file = self.resolve(path)?;

        let content = fs::read_to_string(&file).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => SiteError::NotFound(path.to_owned()),
            _ => SiteError::Io {
                path: file.clone(),
                source: e,
            },
        })?;
        let modified = fs::metadata(&file).and_then(|m| m.modified()).ok();
        let front_matter = FrontMatter::parse(&content)?;

        Ok(SourceDocument {
            path: file,
            front_matter,
            modified,
        })
    }
}
