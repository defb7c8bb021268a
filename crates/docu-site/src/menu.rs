//! Navigation menu built from the content directory.
//!
//! The directory tree is read into [`MenuNode`]s and flattened depth-first
//! into [`MenuEntry`]s. Entries follow the order the file system lists
//! directory contents in, which is platform dependent.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

/// A directory or document in the content tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuNode {
    /// Directory with its nested entries.
    Directory { name: String, children: Vec<MenuNode> },
    /// Document file.
    File {
        /// File name without extension.
        id: String,
        /// Request path: directory names and `id` joined with `/`.
        path: String,
    },
}

/// One navigable document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    /// Display name (file name without extension).
    pub id: String,
    /// Request path relative to the site root.
    pub href: String,
}

/// Walks a content directory for documents with a given extension.
#[derive(Clone, Debug)]
pub struct MenuBuilder {
    suffix: String,
}

impl MenuBuilder {
    /// Create a builder for files with `extension` (no dot).
    #[must_use]
    pub fn new(extension: &str) -> Self {
        Self {
            suffix: format!(".{extension}"),
        }
    }

    /// Read and flatten the menu under `root`.
    pub fn build(&self, root: &Path) -> io::Result<Vec<MenuEntry>> {
        Ok(flatten(&self.read_tree(root)?))
    }

    /// Read the content tree under `root`.
    ///
    /// Symbolic links are not followed. Any I/O error aborts the walk.
    pub fn read_tree(&self, root: &Path) -> io::Result<Vec<MenuNode>> {
        self.read_dir(root, &mut Vec::new())
    }

    fn read_dir(&self, dir: &Path, segments: &mut Vec<String>) -> io::Result<Vec<MenuNode>> {
        let mut nodes = Vec::new();

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let name = entry.file_name().to_string_lossy().into_owned();

            if file_type.is_dir() {
                segments.push(name.clone());
                let children = self.read_dir(&entry.path(), segments)?;
                segments.pop();
                nodes.push(MenuNode::Directory { name, children });
            } else if let Some(id) = name.strip_suffix(&self.suffix) {
                let mut path = segments.join("/");
                if !path.is_empty() {
                    path.push('/');
                }
                path.push_str(id);
                nodes.push(MenuNode::File {
                    id: id.to_owned(),
                    path,
                });
            }
        }

        Ok(nodes)
    }
}

/// Flatten a content tree depth-first into menu entries.
#[must_use]
pub fn flatten(nodes: &[MenuNode]) -> Vec<MenuEntry> {
    let mut entries = Vec::new();
    flatten_into(nodes, &mut entries);
    entries
}

fn flatten_into(nodes: &[MenuNode], entries: &mut Vec<MenuEntry>) {
    for node in nodes {
        match node {
            MenuNode::Directory { children, .. } => flatten_into(children, entries),
            MenuNode::File { id, path } => entries.push(MenuEntry {
                id: id.clone(),
                href: path.clone(),
            }),
        }
    }
}
