//! The Gemini gateway against a local stand-in for the REST endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use stemout_site::{AiGateway, GeminiGateway, Message, ModelConfig, SiteError};

#[derive(Clone, Default)]
struct Recorded {
    /// (path segment, api key header, raw query, body)
    requests: Arc<Mutex<Vec<(String, String, Option<String>, Value)>>>,
}

async fn spawn_fake(status: StatusCode, body: Value) -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route(
            "/v1beta/models/:call",
            post(
                move |State(rec): State<Recorded>,
                      Path(call): Path<String>,
                      RawQuery(query): RawQuery,
                      headers: HeaderMap,
                      Json(payload): Json<Value>| {
                    let body = body.clone();
                    async move {
                        let key = headers
                            .get("x-goog-api-key")
                            .and_then(|value| value.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        rec.requests.lock().unwrap().push((call, key, query, payload));
                        (status, Json(body))
                    }
                },
            ),
        )
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/v1beta"), recorded)
}

fn config(endpoint: String) -> ModelConfig {
    ModelConfig {
        api_key: Some("test-key".into()),
        endpoint,
        ..ModelConfig::default()
    }
}

fn reply(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [{ "text": text }] } }
        ]
    })
}

#[tokio::test]
async fn generate_text_posts_prompt_and_reads_candidate() {
    let (endpoint, recorded) = spawn_fake(StatusCode::OK, reply("A zesty summary.")).await;
    let gateway = GeminiGateway::from_config(&config(endpoint)).unwrap();

    let text = gateway.generate_text("Summarise lemons").await.unwrap();
    assert_eq!(text, "A zesty summary.");

    let requests = recorded.requests.lock().unwrap();
    let (call, key, query, payload) = &requests[0];
    assert_eq!(call, "gemini-2.5-flash:generateContent");
    assert_eq!(key, "test-key");
    assert!(query.is_none(), "credential must not travel in the URL");
    assert_eq!(payload["contents"][0]["role"], "user");
    assert_eq!(payload["contents"][0]["parts"][0]["text"], "Summarise lemons");
    assert!(payload.get("systemInstruction").is_none());
}

#[tokio::test]
async fn converse_sends_instruction_and_history() {
    let (endpoint, recorded) = spawn_fake(StatusCode::OK, reply("Happy to help!")).await;
    let gateway = GeminiGateway::from_config(&config(endpoint)).unwrap();
    let history = vec![Message::user("hi"), Message::bot("hello")];

    let text = gateway
        .converse("Be kind.", &history, "What kits exist?")
        .await
        .unwrap();
    assert_eq!(text, "Happy to help!");

    let requests = recorded.requests.lock().unwrap();
    let payload = &requests[0].3;
    assert_eq!(payload["systemInstruction"]["parts"][0]["text"], "Be kind.");
    let roles: Vec<&str> = payload["contents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["user", "model", "user"]);
}

#[tokio::test]
async fn error_status_maps_to_service_error() {
    let (endpoint, _) = spawn_fake(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "message": "quota" } }),
    )
    .await;
    let gateway = GeminiGateway::from_config(&config(endpoint)).unwrap();

    let err = gateway.generate_text("p").await.unwrap_err();
    assert!(matches!(err, SiteError::Service(ref msg) if msg.contains("rate limit")));
}

#[tokio::test]
async fn empty_candidates_map_to_service_error() {
    let (endpoint, _) = spawn_fake(StatusCode::OK, json!({ "candidates": [] })).await;
    let gateway = GeminiGateway::from_config(&config(endpoint)).unwrap();

    let err = gateway.generate_text("p").await.unwrap_err();
    assert!(matches!(err, SiteError::Service(_)));
}

#[tokio::test]
async fn unreachable_endpoint_maps_to_network_error_without_credentials() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let cfg = ModelConfig {
        timeout_secs: 2,
        api_key: Some("SECRET-KEY-123".into()),
        ..config(format!("http://{addr}/v1beta"))
    };
    let gateway = GeminiGateway::from_config(&cfg).unwrap();
    let err = tokio::time::timeout(Duration::from_secs(5), gateway.generate_text("p"))
        .await
        .unwrap()
        .unwrap_err();
    assert!(err.is_gateway_failure());
    assert!(matches!(err, SiteError::Network(_)));
    let text = err.to_string();
    assert!(!text.contains("SECRET-KEY-123"), "key leaked into {text}");
    assert!(!text.contains(&addr.to_string()), "url leaked into {text}");
}
