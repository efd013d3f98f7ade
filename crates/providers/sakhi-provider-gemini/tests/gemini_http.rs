use sakhi_core::TextGenerator;
use sakhi_provider_gemini::{GeminiConfig, GeminiProvider};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-pro-latest:generateContent";

fn provider(server: &MockServer) -> GeminiProvider {
    GeminiProvider::new(
        GeminiConfig::new("test-key", "gemini-1.5-pro-latest").with_base_url(server.uri()),
    )
}

fn mock_reply(parts: &[&str]) -> serde_json::Value {
    let parts: Vec<_> = parts
        .iter()
        .map(|text| serde_json::json!({ "text": text }))
        .collect();
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 42, "candidatesTokenCount": 7 }
    })
}

#[tokio::test]
async fn sends_prompt_as_single_user_turn() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_json(serde_json::json!({
            "contents": [{ "role": "user", "parts": [{ "text": "You are Riya..." }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_reply(&["heyy ", "kya hua?"])))
        .expect(1)
        .mount(&server)
        .await;

    let reply = provider(&server).generate("You are Riya...").await.unwrap();
    assert_eq!(reply, "heyy kya hua?");
}

#[tokio::test]
async fn http_error_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "error": { "code": 429, "message": "Resource has been exhausted" }
        })))
        .mount(&server)
        .await;

    let err = provider(&server).generate("hi").await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("429"), "{message}");
    assert!(message.contains("Resource has been exhausted"), "{message}");
    assert!(err.is_external());
}

#[tokio::test]
async fn empty_candidates_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": []
        })))
        .mount(&server)
        .await;

    let err = provider(&server).generate("hi").await.unwrap_err();
    assert!(err.to_string().contains("no candidates"));
}

#[tokio::test]
async fn malformed_body_is_a_model_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = provider(&server).generate("hi").await.unwrap_err();
    assert!(err.to_string().starts_with("Model error: Malformed Gemini response"));
}

#[tokio::test]
async fn api_key_stays_out_of_the_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_reply(&["hi"])))
        .mount(&server)
        .await;

    provider(&server).generate("hi").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].url.as_str().contains("test-key"));
}

#[tokio::test]
async fn connection_failure_does_not_leak_api_key() {
    let provider = GeminiProvider::new(
        GeminiConfig::new("secret-api-key", "gemini-1.5-pro-latest")
            .with_base_url("http://127.0.0.1:1"),
    );

    let err = provider.generate("hi").await.unwrap_err();
    let message = err.to_string();
    assert!(err.is_external());
    assert!(message.starts_with("Model error: Gemini request failed"), "{message}");
    assert!(!message.contains("secret-api-key"), "{message}");
}
