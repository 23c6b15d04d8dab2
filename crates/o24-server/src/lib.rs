//! HTTP server for O24DOC.
//!
//! This crate provides an axum HTTP server serving:
//! - Server-rendered documentation pages with sidebar and table of contents
//! - JSON API for navigation and rendered pages
//! - JSON CRUD API for dynamic documents
//! - An optional shared-password gate in front of everything
//!
//! # Quick Start
//!
//! ```ignore
//! use o24_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 8080,
//!         database_url: "sqlite://documents.db".to_owned(),
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
//! Browser ──HTTP──► axum server (o24-server)
//!                        │
//!                        ├─► Access gate (cookie check)
//!                        │
//!                        ├─► HTML views / page API ──► Site ──┬─► static pages (compiled at startup)
//!                        │                                    └─► DocumentStore (every request)
//!                        │
//!                        └─► Document CRUD API ──► DocumentStore
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod templates;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use o24_site::{FsPageSource, NavGroup, Site, SiteConfig};
use o24_store::{DocumentStore, SqliteStore};

use middleware::auth::AccessGate;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Static markdown source directory.
    pub source_dir: PathBuf,
    /// `SQLite` connection URL for dynamic documents.
    pub database_url: String,
    /// Connection pool size.
    pub max_connections: u32,
    /// Top-level static folder that receives dynamic documents.
    pub mount_point: String,
    /// Category folders for dynamic documents.
    pub groups: Vec<NavGroup>,
    /// Shared site password (`None` disables the gate).
    pub password: Option<String>,
    /// Mark the access cookie `Secure`.
    pub secure_cookie: bool,
    /// Access cookie lifetime in days.
    pub cookie_max_age_days: u32,
    /// Site title shown in the header.
    pub site_title: String,
    /// Site description for the meta tag.
    pub site_description: String,
    /// Enable verbose output.
    pub verbose: bool,
    /// Application version (part of page `ETag`s).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from("docs"),
            database_url: "sqlite://.o24doc/documents.db".to_owned(),
            max_connections: 5,
            mount_point: "docs".to_owned(),
            groups: Vec::new(),
            password: None,
            secure_cookie: false,
            cookie_max_age_days: 7,
            site_title: "O24DOC".to_owned(),
            site_description: String::new(),
            verbose: false,
            version: String::new(),
        }
    }
}

/// Run the server.
///
/// Compiles the static page tree, opens the document database and serves
/// until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn DocumentStore> =
        Arc::new(SqliteStore::connect(&config.database_url, config.max_connections).await?);

    let source = FsPageSource::load(config.source_dir.clone());
    tracing::info!(
        source_dir = %source.source_dir().display(),
        pages = source.page_count(),
        "Compiled static pages"
    );

    let site_config = SiteConfig {
        mount_point: config.mount_point.clone(),
        groups: config.groups.clone(),
    };
    let site = Site::new(Arc::new(source), store, site_config);

    let state = Arc::new(AppState {
        site,
        gate: config.password.as_deref().map(|password| {
            AccessGate::new(password, config.secure_cookie, config.cookie_max_age_days)
        }),
        site_title: config.site_title.clone(),
        site_description: config.site_description.clone(),
        verbose: config.verbose,
        version: config.version.clone(),
    });

    if state.gate.is_some() {
        tracing::info!("Password gate enabled");
    }

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from O24DOC config.
///
/// # Arguments
///
/// * `config` - Loaded configuration
/// * `version` - Application version
/// * `verbose` - Enable verbose output
#[must_use]
pub fn server_config_from_config(
    config: &o24_config::Config,
    version: String,
    verbose: bool,
) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.docs_resolved.source_dir.clone(),
        database_url: config.database_resolved.url.clone(),
        max_connections: config.database_resolved.max_connections,
        mount_point: config.docs_resolved.mount_point.clone(),
        groups: config
            .navigation_groups()
            .iter()
            .map(|group| NavGroup {
                category: group.category.clone(),
                name: group.name.clone(),
                title: group.title.clone(),
            })
            .collect(),
        password: config.auth.password.clone(),
        secure_cookie: config.auth.secure_cookie,
        cookie_max_age_days: config.auth.cookie_max_age_days,
        site_title: config.site.title.clone(),
        site_description: config.site.description.clone(),
        verbose,
        version,
    }
}
