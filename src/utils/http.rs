//! HTTP client utilities.

use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::client::ClientError;
use crate::config::ApiConfig;

/// Shared HTTP client with sensible defaults
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, ClientError> {
        Self::from_config(&ApiConfig::default())
    }

    /// Create a client using the user agent and download bound from `config`.
    ///
    /// The metadata request's shorter bound is applied by the caller, so the
    /// client-wide timeout only needs to cover image downloads.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.download_timeout())
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ClientError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Create from an existing reqwest Client
    pub fn from_client(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GET `url` and return the body text exactly as received.
    ///
    /// No charset decoding or BOM stripping is applied; a body that is not
    /// valid UTF-8 is rejected rather than repaired.
    pub async fn get_text(&self, url: Url) -> Result<String, ClientError> {
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| {
            ClientError::MalformedResponse(format!("body is not valid UTF-8: {}", e.utf8_error()))
        })
    }

    /// GET `url` and return the body as opaque bytes
    pub async fn get_bytes(&self, url: Url) -> Result<Vec<u8>, ClientError> {
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(bytes.to_vec())
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        tracing::warn!("HTTP request timed out: {}", err);
    }
    ClientError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::new().is_ok());
    }

    #[tokio::test]
    async fn test_get_text_preserves_body() {
        let mut server = mockito::Server::new_async().await;
        let body = "{ \"id\" :\"abc\" ,\n  \"width\":1 }";
        let _mock = server
            .mock("GET", "/raw")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let url = Url::parse(&format!("{}/raw", server.url())).unwrap();
        assert_eq!(client.get_text(url).await.unwrap(), body);
    }

    #[tokio::test]
    async fn test_get_text_rejects_invalid_utf8() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/latin1")
            .with_status(200)
            .with_header("content-type", "application/json; charset=iso-8859-1")
            .with_body(b"{\"id\":\"caf\xE9\"}".as_slice())
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let url = Url::parse(&format!("{}/latin1", server.url())).unwrap();
        assert!(matches!(
            client.get_text(url).await,
            Err(ClientError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_get_text_keeps_bom() {
        let mut server = mockito::Server::new_async().await;
        let body = "\u{FEFF}{\"id\":\"a\"}";
        let _mock = server
            .mock("GET", "/bom")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let url = Url::parse(&format!("{}/bom", server.url())).unwrap();
        assert_eq!(client.get_text(url).await.unwrap().as_bytes(), body.as_bytes());
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        match client.get_bytes(url).await {
            Err(ClientError::Status { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "not found");
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }
}
