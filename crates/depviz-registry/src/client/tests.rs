//! Unit tests for registry client

use super::*;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_retries: 2,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        multiplier: 2.0,
    }
}

fn client_for(server: &MockServer) -> RegistryClient {
    RegistryClient::with_config(
        &server.uri(),
        AuthConfig::default(),
        fast_retry(),
        Duration::from_secs(5),
    )
    .unwrap()
}

/// Packument body as raw JSON text, so the `dependencies` key order reaches
/// the client exactly as written.
fn document(name: &str, deps: &str) -> String {
    format!(
        r#"{{
            "name": "{name}",
            "dist-tags": {{ "latest": "1.0.0" }},
            "versions": {{
                "0.9.0": {{ "version": "0.9.0", "dependencies": {{ "old-dep": "^1.0.0" }} }},
                "1.0.0": {{ "version": "1.0.0", "dependencies": {deps} }}
            }}
        }}"#
    )
}

fn packument(name: &str, deps: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(document(name, deps), "application/json")
}

#[tokio::test]
async fn test_registry_client_creation() {
    let client = RegistryClient::new().unwrap();
    assert_eq!(client.base_url(), DEFAULT_REGISTRY_URL);
    assert_eq!(client.retry_config.max_retries, 3);
}

#[tokio::test]
async fn test_trailing_slash_is_trimmed() {
    let client = RegistryClient::with_base_url("https://registry.example.com/npm/").unwrap();
    assert_eq!(client.base_url(), "https://registry.example.com/npm");
}

#[tokio::test]
async fn test_invalid_base_url_is_rejected() {
    assert!(matches!(
        RegistryClient::with_base_url("not a url"),
        Err(DepvizError::ConfigValidation { .. })
    ));
    assert!(matches!(
        RegistryClient::with_base_url("ftp://mirror.example.com"),
        Err(DepvizError::ConfigValidation { .. })
    ));
}

#[test]
fn test_encode_package_name() {
    assert_eq!(encode_package_name("lodash"), "lodash");
    assert_eq!(encode_package_name("@types/node"), "@types%2fnode");
}

#[test]
fn test_retry_config_default() {
    let config = RetryConfig::default();
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.initial_delay, Duration::from_millis(100));
    assert_eq!(config.max_delay, Duration::from_secs(10));
    assert_eq!(config.multiplier, 2.0);
}

#[tokio::test]
async fn test_fetch_dependencies_of_latest_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/express"))
        .and(header("Accept", "application/vnd.npm.install-v1+json"))
        .respond_with(packument(
            "express",
            r#"{ "send": "0.18.0", "accepts": "~1.3.8", "body-parser": "1.20.1" }"#,
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let deps = client.fetch_dependencies("express").await.unwrap();
    assert_eq!(deps, vec!["send", "accepts", "body-parser"]);
}

#[tokio::test]
async fn test_fetch_metadata_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nonexistent-package"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    match client.fetch_metadata("nonexistent-package").await {
        Err(DepvizError::PackageNotFound { name }) => assert_eq!(name, "nonexistent-package"),
        other => panic!("Expected PackageNotFound error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(packument("flaky", r#"{ "ms": "2.1.3" }"#))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let deps = client.fetch_dependencies("flaky").await.unwrap();
    assert_eq!(deps, vec!["ms"]);
}

#[tokio::test]
async fn test_scoped_package_url_encoding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/@types%2fnode"))
        .respond_with(packument("@types/node", r#"{ "undici-types": "~5.26.4" }"#))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let deps = client.fetch_dependencies("@types/node").await.unwrap();
    assert_eq!(deps, vec!["undici-types"]);
}

#[tokio::test]
async fn test_malformed_response_becomes_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    assert!(matches!(
        client.fetch_metadata("broken").await,
        Err(DepvizError::JsonParse { .. })
    ));
    assert!(client.direct_dependencies("broken").await.is_empty());
}

#[tokio::test]
async fn test_source_failures_become_empty_lists() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    assert!(client.direct_dependencies("down").await.is_empty());
    assert!(client.direct_dependencies("missing").await.is_empty());
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/private-pkg"))
        .and(header("Authorization", "Bearer s3cret"))
        .respond_with(packument("private-pkg", r#"{}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RegistryClient::with_config(
        &mock_server.uri(),
        AuthConfig {
            token: Some("s3cret".to_string()),
        },
        fast_retry(),
        Duration::from_secs(5),
    )
    .unwrap();

    assert!(client.fetch_dependencies("private-pkg").await.unwrap().is_empty());
}
