//! `o24doc serve` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use o24_config::{CliSettings, Config};
use o24_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover o24doc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Static markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// `SQLite` database URL for dynamic documents (overrides config).
    #[arg(long, env = "O24DOC_DATABASE_URL")]
    database_url: Option<String>,

    /// Enable verbose output (log every request and page resolution).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            source_dir: self.source_dir,
            database_url: self.database_url,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        // Ensure project directory exists with .gitignore
        ensure_project_dir(&config.docs_resolved.project_dir)?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Source directory: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!("Database: {}", config.database_resolved.url));
        output.info(&format!(
            "Dynamic documents mount at: /{}",
            config.docs_resolved.mount_point
        ));

        if config.auth.is_enabled() {
            output.info("Password gate: enabled");
        } else {
            output.warning("Password gate: disabled (no auth.password in config)");
        }

        let server_config = server_config_from_config(&config, version.to_owned(), self.verbose);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}

/// Ensure the `.o24doc/` project directory exists with a `.gitignore`.
pub(crate) fn ensure_project_dir(project_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(project_dir)
        .map_err(|e| CliError::Server(format!("Failed to create project directory: {e}")))?;

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by o24doc\n*\n");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_ensure_project_dir_creates_gitignore() {
        let dir = tempfile::tempdir().unwrap();
        let project_dir = dir.path().join(".o24doc");

        ensure_project_dir(&project_dir).unwrap();

        let gitignore = std::fs::read_to_string(project_dir.join(".gitignore")).unwrap();
        assert_eq!(gitignore, "# Automatically created by o24doc\n*\n");
    }

    #[test]
    fn test_ensure_project_dir_keeps_existing_gitignore() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "custom\n").unwrap();

        ensure_project_dir(dir.path()).unwrap();

        let gitignore = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore, "custom\n");
    }
}
