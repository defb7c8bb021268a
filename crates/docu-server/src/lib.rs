//! HTTP server for Docu.
//!
//! This crate provides an axum server that renders documents on request:
//! - Full HTML pages with the navigation sidebar
//! - JSON API endpoints for pages and navigation
//! - Compiled MDX components
//! - Embedded stylesheet and sidebar script
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use docu_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source_dir: PathBuf::from(".doc"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (docu-server)
//!                        │
//!                        ├─► HTML pages / API routes
//!                        │       │
//!                        │       └─► spawn_blocking ──► Site (menu + pipeline)
//!                        │
//!                        └─► Embedded assets
//! ```
//!
//! Nothing is cached between requests: every request walks the content
//! directory and reads its document again.

mod app;
mod error;
mod handlers;
mod layout;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use docu_renderer::RenderOptions;
use docu_site::{Site, SiteConfig};

pub use app::create_router;
pub use error::ServerError;
pub use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Documentation source directory.
    pub source_dir: PathBuf,
    /// Document file extension, without the dot.
    pub extension: String,
    /// Site title shown in the sidebar heading.
    pub title: String,
    /// Pipeline options.
    pub render: RenderOptions,
    /// Application version (part of the page `ETag`).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from(".doc"),
            extension: "md".to_owned(),
            title: "Docu".to_owned(),
            render: RenderOptions::default(),
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener cannot bind.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let site = Site::new(SiteConfig {
        source_dir: config.source_dir.clone(),
        extension: config.extension.clone(),
        render: config.render,
    });

    let state = Arc::new(AppState::new(site, config.title, config.version));
    let app = create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, source_dir = %config.source_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Docu config.
#[must_use]
pub fn server_config_from_config(config: &docu_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.docs.source_dir.clone(),
        extension: config.docs.extension.clone(),
        title: config.docs.title.clone(),
        render: RenderOptions {
            gfm: config.render.gfm,
            highlight: config.render.highlight,
        },
        version,
    }
}
