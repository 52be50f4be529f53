//! The random-photo fetch lifecycle.
//!
//! A [`RandomImageClient`] performs one request per `init` call and keeps the
//! response (raw body plus parsed document) until [`RandomImageClient::reset`]
//! or the next successful `init`. Two modes exist:
//!
//! - [`FetchMode::Fixed`]: a fully random photo
//! - [`FetchMode::Categorised`]: a random photo matching a tag such as `"cats"`
//!
//! The mode decides the request's `query` parameter, the output directories
//! and the default image filename. Everything else is shared.

mod random;

pub use random::{ClientState, FetchResult, RandomImageClient};

use std::time::Duration;

use crate::credentials::CredentialError;

/// Which flavour of random photo to request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// No category filter
    #[default]
    Fixed,
    /// Filtered by a category/tag string
    Categorised(String),
}

impl FetchMode {
    /// The category tag, if any
    pub fn category(&self) -> Option<&str> {
        match self {
            FetchMode::Fixed => None,
            FetchMode::Categorised(category) => Some(category),
        }
    }

    pub fn is_categorised(&self) -> bool {
        matches!(self, FetchMode::Categorised(_))
    }
}

/// Errors that can occur while fetching or persisting a random photo
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API key could not be resolved. Not worth retrying.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Transport(String),

    /// The request did not complete within the bound
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The server answered with a non-success status
    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not a JSON object
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// An accessor or persistence call was made before a successful `init`
    #[error("Client is not initialized")]
    NotReady,

    /// A caller-supplied filename would escape the output directory
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    /// The cached document lacks a field the operation needs
    #[error("Response is missing field `{0}`")]
    MissingField(&'static str),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Fatal errors indicate a precondition violation rather than a transient failure
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClientError::Configuration(_))
    }

    pub fn is_not_ready(&self) -> bool {
        matches!(self, ClientError::NotReady)
    }

    /// Whether calling `init` again might succeed.
    ///
    /// Server errors, 408 and 429 are transient; other 4xx statuses (such as
    /// 401/403 for a revoked key) are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Transport(_) | ClientError::Timeout(_) => true,
            ClientError::Status { status, .. } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::MalformedResponse(format!("JSON: {}", err))
    }
}

impl From<CredentialError> for ClientError {
    fn from(err: CredentialError) -> Self {
        ClientError::Configuration(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Configuration(format!("invalid URL: {}", err))
    }
}
