//! Random photo client.
//!
//! Talks to `GET /photos/random/` on the Unsplash API.
//! API documentation: <https://unsplash.com/documentation#get-a-random-photo>

use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::client::{ClientError, FetchMode};
use crate::config::Config;
use crate::credentials::CredentialSource;
use crate::models::{Dimension, Photo};
use crate::utils::{sanitize_category, write_replacing, HttpClient};

const RANDOM_PHOTO_PATH: &str = "/photos/random/";

/// One successful response from the random-photo endpoint.
///
/// The raw body and its parsed form are only ever created together, so a
/// `FetchResult` always holds a document that is exactly the parse of `raw`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    raw: String,
    document: Map<String, Value>,
}

impl FetchResult {
    /// Parse a response body; anything other than a JSON object is rejected
    pub fn parse(raw: String) -> Result<Self, ClientError> {
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(document) => Ok(Self { raw, document }),
            other => Err(ClientError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// The body exactly as received
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    pub fn id(&self) -> Option<&str> {
        self.document.get("id").and_then(Value::as_str)
    }

    /// `links.download`
    pub fn download_link(&self) -> Option<&str> {
        self.document
            .get("links")
            .and_then(|links| links.get("download"))
            .and_then(Value::as_str)
    }

    pub fn dimensions(&self) -> Option<Dimension> {
        let field = |name: &str| {
            self.document
                .get(name)
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
        };
        Some(Dimension::new(field("width")?, field("height")?))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Lifecycle state of a [`RandomImageClient`]
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ClientState {
    #[default]
    Uninitialized,
    Ready(FetchResult),
}

impl ClientState {
    pub fn is_ready(&self) -> bool {
        matches!(self, ClientState::Ready(_))
    }

    pub fn result(&self) -> Option<&FetchResult> {
        match self {
            ClientState::Ready(result) => Some(result),
            ClientState::Uninitialized => None,
        }
    }
}

/// Fetches a random photo, optionally scoped to a category, and persists it.
///
/// Each `init` call issues exactly one request. A failed `init` leaves the
/// client as it was: an earlier result stays cached and usable. Accessors
/// return `None` and persistence methods return [`ClientError::NotReady`]
/// until a fetch succeeds, and again after [`reset`](Self::reset).
///
/// Instances are not meant to be shared between tasks; every mutating call
/// takes `&mut self`.
#[derive(Debug)]
pub struct RandomImageClient {
    config: Config,
    credentials: Box<dyn CredentialSource>,
    http: HttpClient,
    mode: FetchMode,
    state: ClientState,
    key_loaded: bool,
}

impl RandomImageClient {
    /// Create a client in fixed mode
    pub fn new(
        config: Config,
        credentials: impl CredentialSource + 'static,
    ) -> Result<Self, ClientError> {
        let http = HttpClient::from_config(&config.api)?;
        Ok(Self::with_http_client(config, credentials, http))
    }

    /// Create a client in categorised mode; `init` will request `category`
    pub fn categorised(
        config: Config,
        credentials: impl CredentialSource + 'static,
        category: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let mut client = Self::new(config, credentials)?;
        client.mode = FetchMode::Categorised(category.into());
        Ok(client)
    }

    /// Create a client around an existing HTTP client
    pub fn with_http_client(
        config: Config,
        credentials: impl CredentialSource + 'static,
        http: HttpClient,
    ) -> Self {
        // only for `Display`; `init` resolves the key again every time
        let key_loaded = credentials.resolve().is_ok();
        Self {
            config,
            credentials: Box::new(credentials),
            http,
            mode: FetchMode::Fixed,
            state: ClientState::Uninitialized,
            key_loaded,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Settings used by later calls, e.g. to point the client at another host
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn mode(&self) -> &FetchMode {
        &self.mode
    }

    pub fn category(&self) -> Option<&str> {
        self.mode.category()
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Fetch a random photo using the current mode
    pub async fn init(&mut self) -> Result<(), ClientError> {
        let mode = self.mode.clone();
        self.fetch(mode).await
    }

    /// Fetch a random photo for `category`.
    ///
    /// On success the client switches to categorised mode for `category`;
    /// on failure the mode and any cached result are left untouched.
    pub async fn init_with_category(
        &mut self,
        category: impl Into<String>,
    ) -> Result<(), ClientError> {
        self.fetch(FetchMode::Categorised(category.into())).await
    }

    async fn fetch(&mut self, mode: FetchMode) -> Result<(), ClientError> {
        let key = self.resolve_key()?;
        let url = self.request_url(&key, &mode)?;

        tracing::debug!(
            category = mode.category().unwrap_or(""),
            "Requesting random photo from {}{}",
            self.config.api.base_url,
            RANDOM_PHOTO_PATH
        );

        let timeout = self.config.api.timeout();
        let raw = match tokio::time::timeout(timeout, self.http.get_text(url)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                tracing::warn!("Random photo request failed: {}", e);
                return Err(e);
            }
            Err(_) => {
                tracing::warn!("Random photo request timed out after {:?}", timeout);
                return Err(ClientError::Timeout(timeout));
            }
        };

        let result = FetchResult::parse(raw).inspect_err(|e| {
            tracing::warn!("Discarding unusable response: {}", e);
        })?;

        tracing::info!(
            id = result.id().unwrap_or("<unknown>"),
            bytes = result.raw().len(),
            "Fetched random photo"
        );

        self.mode = mode;
        self.state = ClientState::Ready(result);
        Ok(())
    }

    fn resolve_key(&mut self) -> Result<String, ClientError> {
        match self.credentials.resolve() {
            Ok(key) => {
                self.key_loaded = true;
                Ok(key)
            }
            Err(e) => {
                self.key_loaded = false;
                tracing::error!("Unable to resolve Unsplash API key: {}", e);
                Err(e.into())
            }
        }
    }

    fn request_url(&self, key: &str, mode: &FetchMode) -> Result<Url, ClientError> {
        let base = self.config.api.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}{}", base, RANDOM_PHOTO_PATH))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("client_id", key);
            if let Some(category) = mode.category() {
                query.append_pair("query", category);
            }
        }
        Ok(url)
    }

    fn ready(&self) -> Result<&FetchResult, ClientError> {
        self.state.result().ok_or(ClientError::NotReady)
    }

    /// The cached response, if any
    pub fn result(&self) -> Option<&FetchResult> {
        self.state.result()
    }

    /// `links.download` of the cached photo
    pub fn download_link(&self) -> Option<&str> {
        self.result()?.download_link()
    }

    /// Width and height of the cached photo
    pub fn image_dimensions(&self) -> Option<Dimension> {
        self.result()?.dimensions()
    }

    pub fn image_id(&self) -> Option<&str> {
        self.result()?.id()
    }

    /// Top-level fields of the cached document
    pub fn entries(&self) -> Option<serde_json::map::Iter<'_>> {
        Some(self.result()?.document().iter())
    }

    /// Decode the cached response into the typed [`Photo`] model
    pub fn photo(&self) -> Result<Photo, ClientError> {
        let result = self.ready()?;
        Ok(serde_json::from_str(result.raw())?)
    }

    /// Filename (without extension) used when `save_image_jpeg` gets none:
    /// `<id>` in fixed mode, `<category>-<id>` in categorised mode.
    pub fn default_filename(&self) -> Result<String, ClientError> {
        let id = self.ready()?.id().ok_or(ClientError::MissingField("id"))?;
        Ok(match self.mode.category() {
            Some(category) => format!("{}-{}", sanitize_category(category), id),
            None => id.to_string(),
        })
    }

    /// Write the raw response body to the mode's JSON cache file
    pub fn save_metadata_json(&self) -> Result<PathBuf, ClientError> {
        let result = self.ready()?;
        let path = self.config.paths.json_cache_path(&self.mode);

        write_replacing(&path, result.raw().as_bytes())?;
        tracing::info!("Saved photo metadata to {}", path.display());
        Ok(path)
    }

    /// Download the photo and write it to `<image dir>/<filename>.jpg`.
    ///
    /// Without a filename, [`default_filename`](Self::default_filename) is used.
    pub async fn save_image_jpeg(&self, filename: Option<&str>) -> Result<PathBuf, ClientError> {
        let result = self.ready()?;
        let filename = match filename {
            Some(name) => name.to_string(),
            None => self.default_filename()?,
        };
        validate_filename(&filename)?;

        let link = result
            .download_link()
            .ok_or(ClientError::MissingField("links.download"))?;
        let url = Url::parse(link)
            .map_err(|e| ClientError::MalformedResponse(format!("bad download link: {}", e)))?;

        let bytes = self.http.get_bytes(url).await.inspect_err(|e| {
            tracing::warn!("Image download failed: {}", e);
        })?;

        let path = self
            .config
            .paths
            .image_dir(&self.mode)
            .join(format!("{}.jpg", filename));
        write_replacing(&path, &bytes)?;

        tracing::info!(bytes = bytes.len(), "Saved image to {}", path.display());
        Ok(path)
    }

    /// Drop the cached response and category
    pub fn reset(&mut self) {
        tracing::debug!("Resetting random image client");
        self.state = ClientState::Uninitialized;
        self.mode = FetchMode::Fixed;
    }
}

/// A bare file stem: no separators, not empty, not `.` or `..`
fn validate_filename(name: &str) -> Result<(), ClientError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\']);
    if bad {
        Err(ClientError::InvalidFilename(name.to_string()))
    } else {
        Ok(())
    }
}

/// `TOKEN` reports whether the most recent key resolution (at construction
/// or during `init`) succeeded; `reset` leaves it as is.
impl fmt::Display for RandomImageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loaded {{TOKEN={}, IMAGE={}, TAG={}}}",
            self.key_loaded,
            self.is_ready(),
            self.mode.is_categorised()
        )
    }
}
