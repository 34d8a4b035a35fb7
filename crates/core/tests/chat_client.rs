use chemecare_core::{AppConfig, ChatClient, ChemError, Completer, Provider};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn client_for(server: &MockServer) -> ChatClient {
    let config = AppConfig {
        api_url: Some(format!("{}/v1/chat/completions", server.uri())),
        ..AppConfig::default()
    };
    ChatClient::new(Provider::Together, &config, "test-key".to_string()).unwrap()
}

#[tokio::test]
async fn returns_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "kimi-k2-instruct",
            "messages": [{"role": "user", "content": "hello"}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "- check pumps"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = client_for(&server).complete("hello").await.unwrap();
    assert_eq!(text, "- check pumps");
}

#[tokio::test]
async fn error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    match client_for(&server).complete("hello").await {
        Err(ChemError::ApiStatus { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid key");
        }
        other => panic!("expected ApiStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_choices_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    assert!(matches!(
        client_for(&server).complete("hello").await,
        Err(ChemError::EmptyResponse)
    ));
}

#[tokio::test]
async fn configured_model_overrides_provider_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({"model": "custom-model"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = AppConfig {
        api_url: Some(format!("{}/v1/chat/completions", server.uri())),
        model: Some("custom-model".to_string()),
        ..AppConfig::default()
    };
    let client = ChatClient::new(Provider::Together, &config, "k".to_string()).unwrap();
    assert_eq!(client.model(), "custom-model");
    assert_eq!(client.complete("hi").await.unwrap(), "ok");
}
