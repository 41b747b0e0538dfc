//! HTTP generation API client tests against a mock server.

use levelset::domain::models::{LadderLevel, ProviderConfig, SectionKind};
use levelset::domain::ports::{ProviderError, TestProvider};
use levelset::infrastructure::provider::GenerationApiClient;

fn client_config(base_url: &str) -> ProviderConfig {
    ProviderConfig {
        base_url: base_url.to_string(),
        api_key: "test-key".to_string(),
        model: "test-model".to_string(),
        timeout_secs: 5,
        rate_limit_rps: 100.0,
        max_retries: 2,
        initial_backoff_ms: 10,
        max_backoff_ms: 50,
        audio_dir: ".levelset/audio".to_string(),
    }
}

#[tokio::test]
async fn test_generate_section_returns_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/test-sections")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"passage": "p", "questions": []}"#)
        .create_async()
        .await;

    let client = GenerationApiClient::new(&client_config(&server.url())).unwrap();
    let payload = client
        .generate_section(SectionKind::Reading, LadderLevel::Intermediate)
        .await
        .unwrap();

    assert_eq!(payload["passage"], "p");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_retried_then_succeeds() {
    let mut server = mockito::Server::new_async().await;
    // Mocks match newest-first; the failing mock answers once, then the
    // retried request falls through to the success mock.
    let success = server
        .mock("POST", "/v1/test-sections")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"prompts": []}"#)
        .create_async()
        .await;
    let failure = server
        .mock("POST", "/v1/test-sections")
        .with_status(500)
        .with_body("boom")
        .expect_at_most(1)
        .create_async()
        .await;

    let client = GenerationApiClient::new(&client_config(&server.url())).unwrap();
    let payload = client
        .generate_section(SectionKind::Writing, LadderLevel::Advanced)
        .await
        .unwrap();

    assert!(payload["prompts"].is_array());
    failure.assert_async().await;
    success.assert_async().await;
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/test-sections")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;

    let client = GenerationApiClient::new(&client_config(&server.url())).unwrap();
    let err = client
        .generate_section(SectionKind::Speaking, LadderLevel::Intermediate)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Failed(_)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/test-sections")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = GenerationApiClient::new(&client_config(&server.url())).unwrap();
    let err = client
        .generate_section(SectionKind::Listening, LadderLevel::Intermediate)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_request_speech_returns_bytes() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/speech")
        .with_status(200)
        .with_body(vec![0u8, 1, 2, 3])
        .create_async()
        .await;

    let client = GenerationApiClient::new(&client_config(&server.url())).unwrap();
    let bytes = client.request_speech("hello there").await.unwrap();
    assert_eq!(bytes, vec![0, 1, 2, 3]);
}
