//! Integration tests for the OpenAI-compatible generation client

use gptwiki::error::GenerationError;
use gptwiki::provider::{GenerationClient, OpenAiClient};
use mockito::{Matcher, Server};
use serde_json::json;

fn client(base_url: String) -> OpenAiClient {
    OpenAiClient::new(
        "gpt-3.5-turbo".to_string(),
        "test-api-key".to_string(),
        Some(base_url),
    )
    .unwrap()
}

#[tokio::test]
async fn test_successful_completion_returns_first_choice() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-api-key")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 2000,
            "messages": [{"role": "user", "content": "Please explain the command in detail: tar"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "choices": [{
                    "message": {"role": "assistant", "content": "tar archives files."},
                    "finish_reason": "stop"
                }]
            }"#,
        )
        .create_async()
        .await;

    let text = client(server.url())
        .generate("Please explain the command in detail: %s", "tar")
        .await
        .unwrap();

    assert_eq!(text, "tar archives files.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_too_many_requests_is_rate_limited() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(429)
        .with_body(r#"{"error": {"message": "slow down"}}"#)
        .create_async()
        .await;

    let err = client(server.url()).generate("%s", "tar").await.unwrap_err();
    assert!(err.is_rate_limited(), "got {:?}", err);
}

#[tokio::test]
async fn test_rate_limit_message_is_rate_limited() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(503)
        .with_body(r#"{"error": {"message": "Rate limit reached for gpt-3.5-turbo"}}"#)
        .create_async()
        .await;

    let err = client(server.url()).generate("%s", "tar").await.unwrap_err();
    assert!(err.is_rate_limited(), "got {:?}", err);
}

#[tokio::test]
async fn test_empty_choices_is_empty_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": []}"#)
        .create_async()
        .await;

    let err = client(server.url()).generate("%s", "tar").await.unwrap_err();
    assert_eq!(err, GenerationError::EmptyResponse);
}

#[tokio::test]
async fn test_blank_content_is_empty_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "  \n"}}]}"#)
        .create_async()
        .await;

    let err = client(server.url()).generate("%s", "tar").await.unwrap_err();
    assert_eq!(err, GenerationError::EmptyResponse);
}

#[tokio::test]
async fn test_server_error_is_transport() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let err = client(server.url()).generate("%s", "tar").await.unwrap_err();
    assert!(matches!(err, GenerationError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_malformed_body_is_transport() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json")
        .create_async()
        .await;

    let err = client(server.url()).generate("%s", "tar").await.unwrap_err();
    assert!(matches!(err, GenerationError::Transport(_)), "got {:?}", err);
}
