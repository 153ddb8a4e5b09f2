//! Layered configuration for the `taskscribe` binary.
//!
//! Settings come from a YAML file with kebab-case keys, then selected
//! environment variables override them. Missing files fall back to defaults.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::extraction::services::ExtractionSettings;
use crate::identity::Identity;
use crate::task::domain::{OwnerId, TaskDomainError};

/// File consulted when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "taskscribe.yml";

/// Environment variable overriding `store.database-url`.
pub const DATABASE_URL_ENV: &str = "TASKSCRIBE_DATABASE_URL";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that failed to load.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid YAML for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// File that failed to parse.
        path: Utf8PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// The environment variable holding the API key is unset.
    #[error("completion API key not found; set the {0} environment variable")]
    MissingApiKey(String),

    /// No database URL is configured.
    #[error("no database URL configured; set store.database-url or {DATABASE_URL_ENV}")]
    MissingDatabaseUrl,

    /// No identity is configured.
    #[error("no identity configured; set identity.user-id")]
    MissingIdentity,

    /// The configured identity is invalid.
    #[error("invalid identity: {0}")]
    InvalidIdentity(#[from] TaskDomainError),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
    /// Completion service settings.
    pub completion: CompletionConfig,
    /// Record store settings.
    pub store: StoreConfig,
    /// Static identity used by the command-line surface.
    pub identity: IdentityConfig,
    /// Log filter directive, such as `info` or `taskscribe=debug`.
    pub log_level: Option<String>,
}

/// Completion service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CompletionConfig {
    /// API base URL, without the `/v1/...` suffix.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Environment variable containing the API key.
    pub api_key_env: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Cap on generated tokens.
    pub max_tokens: u32,
    /// Request timeout in milliseconds; unset means no timeout.
    pub timeout_ms: Option<u64>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_owned(),
            model: "gpt-3.5-turbo".to_owned(),
            api_key_env: "OPENAI_API_KEY".to_owned(),
            temperature: 0.3,
            max_tokens: 1000,
            timeout_ms: None,
        }
    }
}

impl CompletionConfig {
    /// Reads the API key from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] when the variable is unset or
    /// blank.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey(self.api_key_env.clone()))
    }

    /// Returns the sampling settings for the extraction service.
    #[must_use]
    pub const fn extraction_settings(&self) -> ExtractionSettings {
        ExtractionSettings {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Record store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StoreConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: Option<String>,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            pool_size: 4,
        }
    }
}

impl StoreConfig {
    /// Returns the configured database URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when none is set.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}

/// Static identity settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IdentityConfig {
    /// Owner identifier for persisted tasks.
    pub user_id: Option<String>,
    /// Display email.
    pub email: Option<String>,
}

impl IdentityConfig {
    /// Builds the configured identity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingIdentity`] when no user id is set, or
    /// [`ConfigError::InvalidIdentity`] when it is blank.
    pub fn require_identity(&self) -> Result<Identity, ConfigError> {
        let user_id = self.user_id.as_deref().ok_or(ConfigError::MissingIdentity)?;
        let owner = OwnerId::new(user_id)?;
        Ok(Identity::new(owner, self.email.clone()))
    }
}

impl AppConfig {
    /// Loads configuration and applies environment overrides.
    ///
    /// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// in the working directory is used when present, otherwise defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a file cannot be read or parsed.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(explicit) => Self::load_from_file(explicit)?,
            None => {
                let local = Utf8Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    Self::load_from_file(local)?
                } else {
                    debug!("load: no config file found, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parses configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`serde_yaml::Error`] when the text does not match the schema.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Applies environment overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            debug!("apply_overrides: database URL taken from environment");
            self.store.database_url = Some(url);
        }
    }

    fn load_from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = read_utf8_file(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        info!(path = %path, "load: loaded config file");
        Ok(config)
    }
}

/// Reads a UTF-8 text file through a capability-scoped directory handle.
///
/// # Errors
///
/// Returns the I/O error when the parent directory cannot be opened or the
/// file cannot be read.
pub fn read_utf8_file(path: &Utf8Path) -> std::io::Result<String> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| std::io::Error::other(format!("{path} does not name a file")))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}
