//! API key sources.
//!
//! The client never reads files itself; it asks a [`CredentialSource`] for
//! the key on every `init`. Implementations:
//!
//! - [`DotenvCredentials`]: a `KEY=value` file such as `.env`
//! - [`EnvCredentials`]: a process environment variable
//! - [`StaticCredentials`]: a key known up front
//! - [`ChainedCredentials`]: the first of several sources that yields a key

use std::fmt;
use std::path::{Path, PathBuf};

/// Supplies the Unsplash access key
pub trait CredentialSource: Send + Sync + fmt::Debug {
    /// Resolve the key, failing if it is absent
    fn resolve(&self) -> Result<String, CredentialError>;
}

impl<T: CredentialSource + ?Sized> CredentialSource for Box<T> {
    fn resolve(&self) -> Result<String, CredentialError> {
        (**self).resolve()
    }
}

/// Errors that can occur while resolving credentials
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The credential file exists but could not be read or parsed
    #[error("Failed to read {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    /// No key was found
    #[error("{0} is not set")]
    Missing(String),
}

fn non_empty(key: String, name: &str) -> Result<String, CredentialError> {
    let key = key.trim();
    if key.is_empty() {
        Err(CredentialError::Missing(name.to_string()))
    } else {
        Ok(key.to_string())
    }
}

/// Reads a key from a dotenv-style file
#[derive(Debug, Clone)]
pub struct DotenvCredentials {
    path: PathBuf,
    key: String,
}

impl DotenvCredentials {
    pub fn new(path: impl AsRef<Path>, key: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialSource for DotenvCredentials {
    fn resolve(&self) -> Result<String, CredentialError> {
        if !self.path.is_file() {
            return Err(CredentialError::Missing(format!(
                "{} (no file at {})",
                self.key,
                self.path.display()
            )));
        }

        // KEY=value lines with `#` comments are valid INI in the root section
        let settings = config::Config::builder()
            .add_source(
                config::File::new(&self.path.to_string_lossy(), config::FileFormat::Ini)
                    .required(true),
            )
            .build()
            .map_err(|e| CredentialError::Unreadable {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        let value = settings
            .get_string(&self.key)
            .or_else(|_| settings.get_string(&self.key.to_lowercase()))
            .map_err(|_| CredentialError::Missing(self.key.clone()))?;

        non_empty(value, &self.key)
    }
}

/// Reads a key from a process environment variable
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    var: String,
}

impl EnvCredentials {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredentials {
    fn resolve(&self) -> Result<String, CredentialError> {
        let value =
            std::env::var(&self.var).map_err(|_| CredentialError::Missing(self.var.clone()))?;
        non_empty(value, &self.var)
    }
}

/// A fixed key
#[derive(Clone)]
pub struct StaticCredentials(String);

impl StaticCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticCredentials").field(&"<redacted>").finish()
    }
}

impl CredentialSource for StaticCredentials {
    fn resolve(&self) -> Result<String, CredentialError> {
        non_empty(self.0.clone(), "API key")
    }
}

/// Tries each source in order and returns the first key found
#[derive(Debug, Default)]
pub struct ChainedCredentials {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl ChainedCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl CredentialSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl CredentialSource for ChainedCredentials {
    fn resolve(&self) -> Result<String, CredentialError> {
        let mut last_error = None;
        for source in &self.sources {
            match source.resolve() {
                Ok(key) => return Ok(key),
                Err(e) => {
                    tracing::debug!("Credential source {:?} failed: {}", source, e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| CredentialError::Missing("API key".to_string())))
    }
}
