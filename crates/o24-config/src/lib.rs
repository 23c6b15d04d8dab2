//! Configuration management for O24DOC.
//!
//! Parses `o24doc.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `database.url`
//! - `auth.password`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override database URL.
    pub database_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "o24doc.toml";

/// Project data directory, next to the config file.
const PROJECT_DIR: &str = ".o24doc";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Database configuration as written in TOML.
    database: DatabaseConfigRaw,
    /// Password gate configuration.
    pub auth: AuthConfig,
    /// Navigation grouping for dynamic documents.
    pub navigation: NavigationConfig,
    /// Site presentation.
    pub site: SiteConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved database configuration (set after loading).
    #[serde(skip)]
    pub database_resolved: DatabaseConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
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

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    mount_point: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Source directory for static markdown files.
    pub source_dir: PathBuf,
    /// Project directory for o24doc data (.o24doc/).
    pub project_dir: PathBuf,
    /// Top-level static folder that receives dynamic documents.
    pub mount_point: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DatabaseConfigRaw {
    url: Option<String>,
    max_connections: Option<u32>,
}

/// Resolved database configuration.
#[derive(Debug, Default)]
pub struct DatabaseConfig {
    /// `sqlite://` connection URL.
    pub url: String,
    /// Connection pool size.
    pub max_connections: u32,
}

/// Password gate configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared site password. The gate is disabled when unset.
    pub password: Option<String>,
    /// Mark the access cookie `Secure` (HTTPS only).
    pub secure_cookie: bool,
    /// Access cookie lifetime.
    pub cookie_max_age_days: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password: None,
            secure_cookie: false,
            cookie_max_age_days: 7,
        }
    }
}

impl AuthConfig {
    /// Whether requests must present the access cookie.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.password.is_some()
    }
}

/// Navigation configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Category folders, in display order.
    pub groups: Vec<NavigationGroup>,
}

/// Folder that collects dynamic documents of one category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavigationGroup {
    /// Document category.
    pub category: String,
    /// Folder route segment under the mount point.
    pub name: String,
    /// Folder title.
    pub title: String,
}

/// Site presentation settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title shown in the header.
    pub title: String,
    /// Site description for the HTML meta tag.
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "O24DOC".to_owned(),
            description: String::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`auth.password`").
        field: String,
        /// Error message.
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a value usable as a single route segment.
fn require_segment(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains('/') || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "{field} must be a single path segment without '/' or whitespace"
        )));
    }
    Ok(())
}

/// Make a relative `sqlite://` file path relative to `base`.
fn resolve_sqlite_url(url: &str, base: &Path) -> String {
    let Some(rest) = url.strip_prefix("sqlite://") else {
        return url.to_owned();
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
    if path.is_empty() || path.starts_with(':') || Path::new(path).is_absolute() {
        return url.to_owned();
    }
    let resolved = base.join(path);
    match query {
        Some(query) => format!("sqlite://{}?{query}", resolved.display()),
        None => format!("sqlite://{}", resolved.display()),
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `o24doc.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(url) = &settings.database_url {
            self.database_resolved.url.clone_from(url);
        }
    }

    /// Navigation groups in display order.
    #[must_use]
    pub fn navigation_groups(&self) -> &[NavigationGroup] {
        &self.navigation.groups
    }

    /// Search for config file in current directory and parents.
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let project_dir = base.join(PROJECT_DIR);
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            database: DatabaseConfigRaw::default(),
            auth: AuthConfig::default(),
            navigation: NavigationConfig::default(),
            site: SiteConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                mount_point: "docs".to_owned(),
                project_dir: project_dir.clone(),
            },
            database_resolved: DatabaseConfig {
                url: default_database_url(&project_dir),
                max_connections: 5,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        self.validate_database()?;
        self.validate_auth()?;
        self.validate_navigation()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_docs(&self) -> Result<(), ConfigError> {
        require_segment(&self.docs_resolved.mount_point, "docs.mount_point")
    }

    fn validate_database(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.database_resolved.url, "database.url")?;
        if !self.database_resolved.url.starts_with("sqlite:") {
            return Err(ConfigError::Validation(
                "database.url must start with sqlite:".to_owned(),
            ));
        }
        if self.database_resolved.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_auth(&self) -> Result<(), ConfigError> {
        if let Some(password) = &self.auth.password {
            require_non_empty(password, "auth.password")?;
        }
        if self.auth.cookie_max_age_days == 0 {
            return Err(ConfigError::Validation(
                "auth.cookie_max_age_days must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_navigation(&self) -> Result<(), ConfigError> {
        let mut seen = std::collections::HashSet::new();
        for group in &self.navigation.groups {
            require_non_empty(&group.category, "navigation.groups.category")?;
            require_segment(&group.name, "navigation.groups.name")?;
            require_non_empty(&group.title, "navigation.groups.title")?;
            if !seen.insert(group.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "navigation.groups.name {:?} is used more than once",
                    group.name
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref url) = self.database.url {
            self.database.url = Some(expand::expand_env(url, "database.url")?);
        }

        if let Some(ref password) = self.auth.password {
            self.auth.password = Some(expand::expand_env(password, "auth.password")?);
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory and fill defaults.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let project_dir = config_dir.join(PROJECT_DIR);

        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs")),
            mount_point: self
                .docs
                .mount_point
                .as_deref()
                .unwrap_or("docs")
                .trim_matches('/')
                .to_owned(),
            project_dir: project_dir.clone(),
        };

        self.database_resolved = DatabaseConfig {
            url: match &self.database.url {
                Some(url) => resolve_sqlite_url(url, config_dir),
                None => default_database_url(&project_dir),
            },
            max_connections: self.database.max_connections.unwrap_or(5),
        };
    }
}

fn default_database_url(project_dir: &Path) -> String {
    format!("sqlite://{}", project_dir.join("documents.db").display())
}
