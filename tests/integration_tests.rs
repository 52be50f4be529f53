//! Integration tests for the random image client.
//!
//! These tests drive the full fetch, cache and persist cycle against a local
//! mockito server standing in for both the API and the image host.

use mockito::{Matcher, Mock, Server, ServerGuard};
use std::net::TcpListener;
use std::time::Duration;
use tempfile::TempDir;
use unsplash_random::config::PathConfig;
use unsplash_random::credentials::StaticCredentials;
use unsplash_random::{ClientError, ClientState, Config, Dimension, FetchMode, RandomImageClient};

const API_KEY: &str = "test-key";
const JPEG_HEADER: [u8; 6] = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

fn config_for(base_url: &str, out: &TempDir) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_ms = 2000;
    config.paths = PathConfig::rooted_at(out.path());
    config
}

fn client_for(server: &ServerGuard, out: &TempDir) -> RandomImageClient {
    RandomImageClient::new(
        config_for(&server.url(), out),
        StaticCredentials::new(API_KEY),
    )
    .unwrap()
}

fn photo_body(server: &ServerGuard, id: &str) -> String {
    // insignificant whitespace on purpose: persistence must keep it
    format!(
        "{{ \"id\" : \"{id}\",\n  \"width\":400 , \"height\": 300,\n  \"links\": {{\"download\": \"{}/download/{id}\"}} }}",
        server.url()
    )
}

async fn mock_random(server: &mut ServerGuard, query: Option<&str>, body: &str) -> Mock {
    let mut matchers = vec![Matcher::UrlEncoded("client_id".into(), API_KEY.into())];
    if let Some(query) = query {
        matchers.push(Matcher::UrlEncoded("query".into(), query.into()));
    }

    server
        .mock("GET", "/photos/random/")
        .match_query(Matcher::AllOf(matchers))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn test_fetch_fixed_photo() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let body = photo_body(&server, "abc123");
    let mock = mock_random(&mut server, None, &body).await;

    let mut client = client_for(&server, &out);
    client.init().await.unwrap();
    mock.assert_async().await;

    assert!(client.is_ready());
    assert_eq!(client.mode(), &FetchMode::Fixed);
    assert_eq!(client.image_dimensions(), Some(Dimension::new(400, 300)));
    assert_eq!(
        client.download_link(),
        Some(format!("{}/download/abc123", server.url()).as_str())
    );
    assert_eq!(client.result().unwrap().raw(), body);
    assert_eq!(client.photo().unwrap().id, "abc123");
    assert_eq!(client.to_string(), "Loaded {TOKEN=true, IMAGE=true, TAG=false}");
}

#[tokio::test]
async fn test_save_metadata_is_byte_exact() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let body = photo_body(&server, "abc123");
    let _mock = mock_random(&mut server, None, &body).await;

    let mut client = client_for(&server, &out);
    client.init().await.unwrap();

    let path = client.save_metadata_json().unwrap();
    assert_eq!(
        path,
        out.path().join("jsoncaches/random/sample-fixed.json")
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), body);

    // a second save overwrites rather than appends
    let path = client.save_metadata_json().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), body);
}

#[tokio::test]
async fn test_save_image_fixed_mode() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let body = photo_body(&server, "abc123");
    let _api = mock_random(&mut server, None, &body).await;
    let image = server
        .mock("GET", "/download/abc123")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(JPEG_HEADER)
        .create_async()
        .await;

    let mut client = client_for(&server, &out);
    client.init().await.unwrap();

    let path = client.save_image_jpeg(None).await.unwrap();
    image.assert_async().await;
    assert_eq!(path, out.path().join("random/fixed/abc123.jpg"));
    assert_eq!(std::fs::read(&path).unwrap(), JPEG_HEADER);

    let named = client.save_image_jpeg(Some("wallpaper")).await.unwrap();
    assert_eq!(named, out.path().join("random/fixed/wallpaper.jpg"));
}

#[tokio::test]
async fn test_categorised_fetch_and_save() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let body = photo_body(&server, "xyz");
    let api = mock_random(&mut server, Some(" cats "), &body).await;
    let _image = server
        .mock("GET", "/download/xyz")
        .with_status(200)
        .with_body("jpeg bytes")
        .create_async()
        .await;

    let mut client = client_for(&server, &out);
    client.init_with_category(" cats ").await.unwrap();
    api.assert_async().await;

    assert_eq!(client.category(), Some(" cats "));
    assert_eq!(client.default_filename().unwrap(), "cats-xyz");

    let path = client.save_image_jpeg(None).await.unwrap();
    assert_eq!(path, out.path().join("random/categorised/cats-xyz.jpg"));

    let json = client.save_metadata_json().unwrap();
    assert_eq!(json, out.path().join("jsoncaches/random/sample-tag.json"));
}

#[tokio::test]
async fn test_categorised_constructor_uses_category_on_init() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let body = photo_body(&server, "dog1");
    let api = mock_random(&mut server, Some("dogs"), &body).await;

    let mut client = RandomImageClient::categorised(
        config_for(&server.url(), &out),
        StaticCredentials::new(API_KEY),
        "dogs",
    )
    .unwrap();
    client.init().await.unwrap();
    api.assert_async().await;
    assert_eq!(client.default_filename().unwrap(), "dogs-dog1");
}

#[tokio::test]
async fn test_second_init_replaces_first() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();

    let first_body = photo_body(&server, "first");
    let first = mock_random(&mut server, None, &first_body).await;
    let mut client = client_for(&server, &out);
    client.init().await.unwrap();
    assert_eq!(client.image_id(), Some("first"));
    first.remove_async().await;

    let second_body = photo_body(&server, "second");
    let _second = mock_random(&mut server, None, &second_body).await;
    client.init().await.unwrap();

    assert_eq!(client.image_id(), Some("second"));
    assert_eq!(client.default_filename().unwrap(), "second");
    assert_eq!(client.result().unwrap().raw(), second_body);
    assert!(client.download_link().unwrap().ends_with("/download/second"));
}

#[tokio::test]
async fn test_failed_refetch_keeps_previous_result() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let body = photo_body(&server, "keep");

    let ok = mock_random(&mut server, None, &body).await;
    let mut client = client_for(&server, &out);
    client.init().await.unwrap();
    ok.remove_async().await;

    let _down = server
        .mock("GET", "/photos/random/")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("service unavailable")
        .create_async()
        .await;

    let err = client.init().await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 503, .. }));
    assert!(err.is_transient());

    // a failed categorised fetch must not switch the mode either
    assert!(client.init_with_category("birds").await.is_err());

    assert_eq!(client.image_id(), Some("keep"));
    assert_eq!(client.mode(), &FetchMode::Fixed);
    assert_eq!(client.result().unwrap().raw(), body);
}

#[tokio::test]
async fn test_malformed_body_does_not_populate_state() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let _mock = mock_random(&mut server, None, "<html>rate limited</html>").await;

    let mut client = client_for(&server, &out);
    let err = client.init().await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
    assert_eq!(client.state(), &ClientState::Uninitialized);
}

#[tokio::test]
async fn test_non_utf8_body_is_rejected() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let bad_body: &[u8] = b"{\"id\":\"a\xFF\",\"width\":1,\"height\":1}";
    let bad = server
        .mock("GET", "/photos/random/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(bad_body)
        .create_async()
        .await;

    let mut client = client_for(&server, &out);
    let err = client.init().await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
    assert_eq!(client.state(), &ClientState::Uninitialized);
    bad.remove_async().await;

    // a cached result survives a later undecodable body
    let body = photo_body(&server, "good");
    let ok = mock_random(&mut server, None, &body).await;
    client.init().await.unwrap();
    ok.remove_async().await;

    let _latin1 = server
        .mock("GET", "/photos/random/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json; charset=iso-8859-1")
        .with_body(b"{\"id\":\"caf\xE9\"}".as_slice())
        .create_async()
        .await;

    let err = client.init().await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
    assert_eq!(client.image_id(), Some("good"));

    let path = client.save_metadata_json().unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), body.as_bytes());
}

#[tokio::test]
async fn test_bom_body_is_rejected_not_stripped() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let body = format!("\u{FEFF}{}", photo_body(&server, "bom"));
    let _mock = mock_random(&mut server, None, &body).await;

    // the BOM reaches the JSON parser, which refuses it
    let mut client = client_for(&server, &out);
    let err = client.init().await.unwrap_err();
    assert!(matches!(err, ClientError::MalformedResponse(_)));
    assert!(!client.is_ready());
}

#[tokio::test]
async fn test_timeout_after_success_keeps_previous_result() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let body = photo_body(&server, "first");
    let _mock = mock_random(&mut server, None, &body).await;

    let mut client = client_for(&server, &out);
    client.init().await.unwrap();
    assert_eq!(client.image_id(), Some("first"));

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    client.config_mut().api.base_url = format!("http://{}", listener.local_addr().unwrap());
    client.config_mut().api.timeout_ms = 100;

    let err = client.init_with_category("cats").await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(d) if d == Duration::from_millis(100)));
    assert!(err.is_transient());

    assert!(client.is_ready());
    assert_eq!(client.mode(), &FetchMode::Fixed);
    assert_eq!(client.image_id(), Some("first"));
    assert_eq!(client.result().unwrap().raw(), body);
    drop(listener);
}

#[tokio::test]
async fn test_timeout_leaves_client_uninitialized() {
    // accepts connections into the backlog but never answers
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let out = TempDir::new().unwrap();

    let mut config = config_for(&base_url, &out);
    config.api.timeout_ms = 100;
    let mut client = RandomImageClient::new(config, StaticCredentials::new(API_KEY)).unwrap();

    let err = client.init().await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(d) if d == Duration::from_millis(100)));
    assert!(!client.is_ready());
    assert!(client.save_metadata_json().unwrap_err().is_not_ready());
    drop(listener);
}

#[tokio::test]
async fn test_missing_credentials_skip_network() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let mut client = RandomImageClient::new(
        config_for(&server.url(), &out),
        StaticCredentials::new(""),
    )
    .unwrap();

    let err = client.init().await.unwrap_err();
    assert!(err.is_fatal());
    assert!(!client.is_ready());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_image_download_failure() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let api_body = photo_body(&server, "gone");
    let _api = mock_random(&mut server, None, &api_body).await;
    let _image = server
        .mock("GET", "/download/gone")
        .with_status(404)
        .create_async()
        .await;

    let mut client = client_for(&server, &out);
    client.init().await.unwrap();

    let err = client.save_image_jpeg(None).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 404, .. }));
    assert!(!out.path().join("random/fixed/gone.jpg").exists());
}

#[tokio::test]
async fn test_reset_after_fetch() {
    let mut server = Server::new_async().await;
    let out = TempDir::new().unwrap();
    let api_body = photo_body(&server, "abc");
    let _api = mock_random(&mut server, Some("cats"), &api_body).await;

    let mut client = client_for(&server, &out);
    client.init_with_category("cats").await.unwrap();
    client.reset();

    assert_eq!(client.state(), &ClientState::Uninitialized);
    assert_eq!(client.category(), None);
    assert_eq!(client.download_link(), None);
    assert_eq!(client.image_dimensions(), None);
    assert!(client.save_metadata_json().unwrap_err().is_not_ready());
    assert!(client.save_image_jpeg(None).await.unwrap_err().is_not_ready());
}
