//! Configuration for Docu.
//!
//! Reads `docu.toml` from an explicit path or from the nearest parent
//! directory that has one. CLI settings given to [`Config::load`] override
//! file values.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 7979
//!
//! [docs]
//! source_dir = ".doc"
//! extension = "md"
//! title = "Docu"
//!
//! [render]
//! gfm = true
//! highlight = true
//! ```
//!
//! `server.host`, `docs.source_dir` and `docs.title` expand `${VAR}` and
//! `${VAR:-default}`. A relative `docs.source_dir` is taken from the
//! directory holding the config file.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

const CONFIG_FILENAME: &str = "docu.toml";

/// CLI values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub source_dir: Option<PathBuf>,
    pub highlight: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub docs: DocsConfig,
    pub render: RenderConfig,
    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// `[server]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

/// `[docs]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Content directory holding the documents.
    pub source_dir: PathBuf,
    /// Document file extension, without the dot.
    pub extension: String,
    /// Site title shown above the navigation menu.
    pub title: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(".doc"),
            extension: "md".to_owned(),
            title: "Docu".to_owned(),
        }
    }
}

/// `[render]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// GitHub Flavored Markdown extensions.
    pub gfm: bool,
    /// Syntax highlighting of code blocks.
    pub highlight: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            highlight: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

impl Config {
    /// Load configuration, then apply CLI settings.
    ///
    /// Without an explicit `config_path`, `docu.toml` is looked up in the
    /// current directory and its parents; defaults apply when none exists.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Self::load_from_file(path)?,
            None => match discover_config() {
                Some(path) => Self::load_from_file(&path)?,
                None => {
                    let mut config = Self::default();
                    let cwd = std::env::current_dir().unwrap_or_default();
                    config.docs.source_dir = cwd.join(&config.docs.source_dir);
                    config
                }
            },
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        Ok(config)
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.server.host = expand::expand_env(&config.server.host, "server.host")?;
        config.docs.title = expand::expand_env(&config.docs.title, "docs.title")?;
        let source_dir = expand::expand_env(
            &config.docs.source_dir.to_string_lossy(),
            "docs.source_dir",
        )?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.docs.source_dir = config_dir.join(source_dir);
        config.config_path = Some(path.to_path_buf());

        let extension = &config.docs.extension;
        if extension.is_empty() || extension.starts_with('.') || extension.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "docs.extension must be a bare extension like \"md\", got \"{extension}\""
            )));
        }
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs.source_dir.clone_from(source_dir);
        }
        if let Some(highlight) = settings.highlight {
            self.render.highlight = highlight;
        }
    }
}

/// Nearest `docu.toml` in the current directory or its parents.
fn discover_config() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
