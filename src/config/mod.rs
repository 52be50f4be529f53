//! Configuration management.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! base_url = "https://api.unsplash.com"
//! timeout_ms = 2000
//! download_timeout_secs = 30
//!
//! [paths]
//! json_cache_dir = "resources/jsoncaches/random"
//! fixed_image_dir = "resources/random/fixed"
//! categorised_image_dir = "resources/random/categorised"
//!
//! [credentials]
//! env_file = ".env"
//! key_name = "API_KEY"
//! ```
//!
//! Any value can be overridden from the environment with the
//! `UNSPLASH_RANDOM_` prefix and `__` between sections, e.g.
//! `UNSPLASH_RANDOM_API__TIMEOUT_MS=5000`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::FetchMode;
use crate::credentials::{ChainedCredentials, DotenvCredentials, EnvCredentials};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Endpoint and timeouts
    #[serde(default)]
    pub api: ApiConfig,

    /// Output locations for cached JSON and saved images
    #[serde(default)]
    pub paths: PathConfig,

    /// Where the API key comes from
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

impl Config {
    /// Build the default credential chain: the configured `.env` file, then
    /// the `UNSPLASH_API_KEY` environment variable.
    pub fn credential_source(&self) -> ChainedCredentials {
        ChainedCredentials::new()
            .with(DotenvCredentials::new(
                &self.credentials.env_file,
                &self.credentials.key_name,
            ))
            .with(EnvCredentials::new(UNSPLASH_API_KEY_VAR))
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }
}

/// Environment variable consulted when the `.env` file has no key
pub const UNSPLASH_API_KEY_VAR: &str = "UNSPLASH_API_KEY";

/// API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Unsplash API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bound on the metadata request, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Bound on the image download, in seconds
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            download_timeout_secs: default_download_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.unsplash.com".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_download_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Filesystem destinations, resolved per [`FetchMode`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// Directory for the cached metadata JSON
    #[serde(default = "default_json_cache_dir")]
    pub json_cache_dir: PathBuf,

    /// Directory for images fetched without a category
    #[serde(default = "default_fixed_image_dir")]
    pub fixed_image_dir: PathBuf,

    /// Directory for images fetched with a category
    #[serde(default = "default_categorised_image_dir")]
    pub categorised_image_dir: PathBuf,

    #[serde(default = "default_fixed_cache_file")]
    pub fixed_cache_file: String,

    #[serde(default = "default_categorised_cache_file")]
    pub categorised_cache_file: String,
}

impl PathConfig {
    /// Put every output under one root, keeping the default layout
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            json_cache_dir: root.join("jsoncaches").join("random"),
            fixed_image_dir: root.join("random").join("fixed"),
            categorised_image_dir: root.join("random").join("categorised"),
            ..Self::default()
        }
    }

    /// Where `save_metadata_json` writes for the given mode
    pub fn json_cache_path(&self, mode: &FetchMode) -> PathBuf {
        let file = match mode {
            FetchMode::Fixed => &self.fixed_cache_file,
            FetchMode::Categorised(_) => &self.categorised_cache_file,
        };
        self.json_cache_dir.join(file)
    }

    /// Directory `save_image_jpeg` writes into for the given mode
    pub fn image_dir(&self, mode: &FetchMode) -> &Path {
        match mode {
            FetchMode::Fixed => &self.fixed_image_dir,
            FetchMode::Categorised(_) => &self.categorised_image_dir,
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            json_cache_dir: default_json_cache_dir(),
            fixed_image_dir: default_fixed_image_dir(),
            categorised_image_dir: default_categorised_image_dir(),
            fixed_cache_file: default_fixed_cache_file(),
            categorised_cache_file: default_categorised_cache_file(),
        }
    }
}

fn default_json_cache_dir() -> PathBuf {
    PathBuf::from("resources/jsoncaches/random")
}

fn default_fixed_image_dir() -> PathBuf {
    PathBuf::from("resources/random/fixed")
}

fn default_categorised_image_dir() -> PathBuf {
    PathBuf::from("resources/random/categorised")
}

fn default_fixed_cache_file() -> String {
    "sample-fixed.json".to_string()
}

fn default_categorised_cache_file() -> String {
    "sample-tag.json".to_string()
}

/// Credential file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,

    /// Key looked up inside the env file
    #[serde(default = "default_key_name")]
    pub key_name: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            env_file: default_env_file(),
            key_name: default_key_name(),
        }
    }
}

fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}

fn default_key_name() -> String {
    "API_KEY".to_string()
}

/// Load configuration from a file, with `UNSPLASH_RANDOM_*` overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix("UNSPLASH_RANDOM").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
