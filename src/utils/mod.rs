//! Utility modules supporting the client.
//!
//! - [`HttpClient`]: Shared reqwest client with user agent and timeouts
//! - [`write_replacing`]: Write-then-rename file persistence
//! - [`sanitize_category`]: Turn a category tag into a filename fragment

mod fs;
mod http;

pub use fs::{sanitize_category, write_replacing};
pub use http::HttpClient;
