//! Layered configuration for the EOS server.
//!
//! Merge order, later layers overriding earlier ones:
//! 1. Compiled defaults
//! 2. `eos.toml` in the working directory, or the file given on the command
//!    line
//! 3. `EOS_*` environment variables, e.g. `EOS_SERVER_PORT` or
//!    `EOS_STORAGE_DATABASE_URL`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration file read when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "eos.toml";

const ENV_PREFIX: &str = "EOS_";
const SECTIONS: [&str; 4] = ["server", "storage", "pagination", "log"];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    /// The merged configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EosConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Storage backend settings.
    pub storage: StorageConfig,
    /// Listing page sizes.
    pub pagination: PaginationConfig,
    /// Log output settings.
    pub log: LogConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Origin allowed to make credentialed cross-origin requests.
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 5000,
            allowed_origin: "http://localhost:3000".to_owned(),
        }
    }
}

/// Which repository implementation backs the tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps; data is lost on restart.
    #[default]
    Memory,
    /// `PostgreSQL` through a diesel connection pool.
    Postgres,
}

/// Storage backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Selected backend.
    pub backend: StorageBackend,
    /// Connection URL, required for `postgres`.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            database_url: None,
            max_connections: 8,
        }
    }
}

/// Storage selection with the settings each backend needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageTarget<'a> {
    /// Process-local maps.
    Memory,
    /// `PostgreSQL` at `database_url`.
    Postgres {
        /// Non-blank connection URL.
        database_url: &'a str,
    },
}

impl StorageConfig {
    /// Resolves the configured backend together with its connection URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `postgres` is selected without a
    /// non-blank `database_url`.
    pub fn target(&self) -> Result<StorageTarget<'_>, ConfigError> {
        match self.backend {
            StorageBackend::Memory => Ok(StorageTarget::Memory),
            StorageBackend::Postgres => self
                .database_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(|database_url| StorageTarget::Postgres { database_url })
                .ok_or_else(|| {
                    ConfigError::Invalid(
                        "storage.database_url is required for the postgres backend".to_owned(),
                    )
                }),
        }
    }
}

/// Listing page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Page size used when a listing omits `limit`.
    pub default_limit: u32,
    /// Largest page size a listing may request.
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 50,
            max_limit: 100,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

impl EosConfig {
    /// Checks cross-field constraints that deserialization cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first inconsistency.
    pub fn validate(self) -> Result<Self, ConfigError> {
        self.storage.target()?;
        if self.storage.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "storage.max_connections must be at least 1".to_owned(),
            ));
        }
        let PaginationConfig {
            default_limit,
            max_limit,
        } = self.pagination;
        if default_limit == 0 || default_limit > max_limit {
            return Err(ConfigError::Invalid(format!(
                "pagination.default_limit must be between 1 and pagination.max_limit ({max_limit})"
            )));
        }
        Ok(self)
    }
}

/// Loads configuration from defaults, `path` (or `eos.toml` when `None`) and
/// `EOS_*` environment variables.
///
/// A missing file is not an error; its layer is simply empty.
///
/// # Errors
///
/// Returns [`ConfigError`] when a source is malformed or the result is
/// inconsistent.
pub fn load_config(path: Option<&Path>) -> Result<EosConfig, ConfigError> {
    let file = path.map_or_else(|| Toml::file(DEFAULT_CONFIG_FILE), Toml::file);
    extract(
        &Figment::new()
            .merge(Serialized::defaults(EosConfig::default()))
            .merge(file)
            .merge(env_provider()),
    )
}

/// Loads configuration from defaults and a TOML string only.
///
/// # Errors
///
/// Returns [`ConfigError`] when the TOML is malformed or the result is
/// inconsistent.
pub fn load_config_from_str(toml_content: &str) -> Result<EosConfig, ConfigError> {
    extract(
        &Figment::new()
            .merge(Serialized::defaults(EosConfig::default()))
            .merge(Toml::string(toml_content)),
    )
}

fn extract(figment: &Figment) -> Result<EosConfig, ConfigError> {
    figment
        .extract::<EosConfig>()
        .map_err(Box::new)?
        .validate()
}

/// Maps `EOS_SECTION_KEY` onto `section.key`, leaving underscores inside the
/// key intact (`EOS_STORAGE_DATABASE_URL` becomes `storage.database_url`).
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| {
        let name = key.as_str().to_ascii_lowercase();
        SECTIONS
            .iter()
            .find_map(|section| {
                name.strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .map(|rest| format!("{section}.{rest}"))
            })
            .unwrap_or_else(|| name.clone())
            .into()
    })
}
