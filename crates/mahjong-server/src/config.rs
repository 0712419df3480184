//! Layered configuration for the ledger server.
//!
//! Sources, later ones winning:
//!
//! 1. Built-in defaults (listen on `0.0.0.0:5050`, database at
//!    `instance/mahjong.db`, `info` logging, permissive CORS)
//! 2. An optional YAML or TOML file, `mahjong-ledger.yaml` unless
//!    `MAHJONG_CONFIG` names another
//! 3. `MAHJONG__<SECTION>__<KEY>` environment variables
//!    (e.g. `MAHJONG__SERVER__PORT=8080`)
//! 4. `DATABASE_URL`, which overrides `database.url`

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use mahjong_db::DbConfig;
use serde::Deserialize;

use crate::server::ServerConfig;

/// Config file read when `MAHJONG_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "mahjong-ledger.yaml";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "MAHJONG_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or the merged result has the wrong shape.
    #[error("failed to load config: {source}")]
    Load {
        /// The underlying `config` crate error.
        #[from]
        source: config::ConfigError,
    },
}

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Ledger database settings.
    pub database: DatabaseConfig,
    /// Log output settings.
    pub logging: LoggingConfig,
    /// Cross-origin policy.
    pub cors: CorsConfig,
}

/// Ledger database settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL.
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// Seconds to wait for a free connection.
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Convert into the data layer's pool configuration.
    pub fn to_db_config(&self) -> DbConfig {
        DbConfig::new(&self.url)
            .with_max_connections(self.max_connections)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive (trace, debug, info, warn, error) used when
    /// `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

/// Cross-origin policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CorsConfig {
    /// Allow requests from any origin with any method and header.
    pub allow_any_origin: bool,
}

impl AppConfig {
    /// Load configuration from the default sources.
    ///
    /// The file is `$MAHJONG_CONFIG` if set, else [`DEFAULT_CONFIG_PATH`];
    /// a missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source is unreadable or a value has
    /// the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        Self::from_file(&path)
    }

    /// Load configuration with `path` as the file source, plus defaults and
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a source is unreadable or a value has
    /// the wrong type.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = defaults()?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("MAHJONG")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from a YAML string layered over the defaults.
    /// Environment variables are not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the YAML is invalid or a value has
    /// the wrong type.
    pub fn parse_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config = defaults()?
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5050_i64)?
        .set_default("database.url", "sqlite://instance/mahjong.db")?
        .set_default("database.max_connections", 5_i64)?
        .set_default("database.connect_timeout_secs", 5_i64)?
        .set_default("logging.level", "info")?
        .set_default("logging.json", false)?
        .set_default("cors.allow_any_origin", true)
}
