//! OpenAI adapter tests against a local wiremock server.

use blog_service::config::OpenAiConfig;
use blog_service::services::generation::{GenerationClient, GenerationError, MAX_TOKENS, MODEL};
use blog_service::services::{OpenAiClient, Prompt};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAiClient {
    let config = OpenAiConfig::new("test-key").with_base_url(format!("{}/v1", server.uri()));
    OpenAiClient::new(config).expect("Failed to build client")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 60, "completion_tokens": 420, "total_tokens": 480 }
    })
}

async fn mount_status(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn returns_generated_text_from_single_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": MODEL,
            "max_tokens": MAX_TOKENS,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "  AI will transform...\n\nEverything.  ",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let post = client_for(&server)
        .generate(&Prompt::for_topic("The Future of AI"))
        .await
        .expect("generation should succeed");

    assert_eq!(post.text(), "AI will transform...\n\nEverything.");
    assert_eq!(post.word_count(), 4);
}

#[tokio::test]
async fn prompt_messages_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "system" },
                { "role": "user" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .generate(&Prompt::for_topic("Rust"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("about: Rust"));
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;
    mount_status(
        &server,
        401,
        json!({ "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" } }),
    )
    .await;

    let err = client_for(&server)
        .generate(&Prompt::for_topic("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Authentication(_)), "{:?}", err);
}

#[tokio::test]
async fn forbidden_maps_to_authentication_error() {
    let server = MockServer::start().await;
    mount_status(&server, 403, json!({ "error": { "message": "forbidden" } })).await;

    let err = client_for(&server)
        .generate(&Prompt::for_topic("x"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "authentication");
}

#[tokio::test]
async fn too_many_requests_maps_to_rate_limit_without_retry() {
    let server = MockServer::start().await;
    // expect(1) also proves there is no retry.
    mount_status(&server, 429, json!({ "error": { "message": "Rate limit reached" } })).await;

    let err = client_for(&server)
        .generate(&Prompt::for_topic("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::RateLimit(_)), "{:?}", err);
}

#[tokio::test]
async fn server_error_maps_to_unknown() {
    let server = MockServer::start().await;
    mount_status(&server, 500, json!({ "error": { "message": "boom" } })).await;

    let err = client_for(&server)
        .generate(&Prompt::for_topic("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Unknown(_)), "{:?}", err);
}

#[tokio::test]
async fn empty_choices_map_to_unknown() {
    let server = MockServer::start().await;
    mount_status(&server, 200, json!({ "choices": [] })).await;

    let err = client_for(&server)
        .generate(&Prompt::for_topic("x"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "unknown");
}

#[tokio::test]
async fn blank_content_maps_to_unknown() {
    let server = MockServer::start().await;
    mount_status(&server, 200, completion("   \n ")).await;

    let err = client_for(&server)
        .generate(&Prompt::for_topic("x"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "unknown");
}

#[tokio::test]
async fn malformed_json_maps_to_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate(&Prompt::for_topic("x"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "unknown");
}

#[tokio::test]
async fn connection_refused_maps_to_transport() {
    // Grab a free port, then release it so nothing is listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = OpenAiConfig::new("test-key").with_base_url(format!("http://127.0.0.1:{}/v1", port));
    let err = OpenAiClient::new(config)
        .unwrap()
        .generate(&Prompt::for_topic("x"))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Transport(_)), "{:?}", err);
}

#[tokio::test]
async fn slow_upstream_times_out_as_transport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("late"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut config = OpenAiConfig::new("test-key").with_base_url(format!("{}/v1", server.uri()));
    config.request_timeout = Duration::from_millis(200);

    let err = OpenAiClient::new(config)
        .unwrap()
        .generate(&Prompt::for_topic("x"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "transport");
}
