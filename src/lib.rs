//! # Unsplash Random
//!
//! A small client library for the Unsplash random-photo endpoint: fetch one
//! photo's metadata, keep it in memory, save the raw JSON to disk, and download
//! the image itself as a JPEG.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`client`]: The [`RandomImageClient`] fetch lifecycle and its error type
//! - [`credentials`]: Pluggable API key sources (`.env` file, environment, static)
//! - [`config`]: API endpoint, timeouts and output paths
//! - [`models`]: Typed views over the JSON the API returns (photo, user, location, EXIF)
//! - [`utils`]: HTTP client and filesystem helpers
//!
//! ## Example
//!
//! ```rust,no_run
//! use unsplash_random::{Config, RandomImageClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let credentials = config.credential_source();
//! let mut client = RandomImageClient::new(config, credentials)?;
//!
//! client.init_with_category("cats").await?;
//! println!("download link: {:?}", client.download_link());
//! client.save_metadata_json()?;
//! client.save_image_jpeg(None).await?;
//! client.reset();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use client::{ClientError, ClientState, FetchMode, FetchResult, RandomImageClient};
pub use config::Config;
pub use credentials::CredentialSource;
pub use models::{Dimension, Photo};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
