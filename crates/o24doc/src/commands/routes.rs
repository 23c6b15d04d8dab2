//! `o24doc routes` command implementation.
//!
//! Prints the merged route space the server would show right now: every
//! static page, plus the dynamic documents that survived deduplication.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use o24_config::{CliSettings, Config};
use o24_server::server_config_from_config;
use o24_site::{
    FsPageSource, MergedRouteSpace, RouteOrigin, Site, SiteConfig, find_route, visit_nodes,
};
use o24_store::{DocumentStore, SqliteStore};

use crate::commands::serve::ensure_project_dir;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    /// Path to configuration file (default: auto-discover o24doc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Static markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// `SQLite` database URL for dynamic documents (overrides config).
    #[arg(long, env = "O24DOC_DATABASE_URL")]
    database_url: Option<String>,
}

impl RoutesArgs {
    /// Execute the routes command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the database cannot be opened.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            database_url: self.database_url,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        ensure_project_dir(&config.docs_resolved.project_dir)?;
        let server_config = server_config_from_config(&config, String::new(), false);

        let store: Arc<dyn DocumentStore> = Arc::new(
            SqliteStore::connect(&server_config.database_url, server_config.max_connections)
                .await?,
        );
        let source = Arc::new(FsPageSource::load(server_config.source_dir));
        let site = Site::new(
            source,
            store,
            SiteConfig {
                mount_point: server_config.mount_point,
                groups: server_config.groups,
            },
        );

        let nav = site.navigation().await;
        if find_route(nav.tree(), &site.mount_route()).is_none() {
            output.warning(&format!(
                "No static folder at {}, dynamic documents are not listed",
                site.mount_route()
            ));
        }

        let lines = route_lines(&nav);
        for line in &lines {
            output.route(&line.origin.to_string(), &line.route, &line.title);
        }

        let dynamic = lines
            .iter()
            .filter(|l| l.origin == RouteOrigin::Dynamic)
            .count();
        output.success(&format!(
            "{} routes ({} static, {dynamic} dynamic)",
            lines.len(),
            lines.len() - dynamic
        ));

        Ok(())
    }
}

/// One printed route.
#[derive(Debug, PartialEq, Eq)]
struct RouteLine {
    origin: RouteOrigin,
    route: String,
    title: String,
}

/// Routes of the merged tree in navigation order.
fn route_lines(nav: &MergedRouteSpace) -> Vec<RouteLine> {
    let mut lines = Vec::with_capacity(nav.len());
    visit_nodes(nav.tree(), &mut |node| {
        if let Some(origin) = nav.origin(&node.route) {
            lines.push(RouteLine {
                origin,
                route: node.route.clone(),
                title: node.title.clone(),
            });
        }
    });
    lines
}
