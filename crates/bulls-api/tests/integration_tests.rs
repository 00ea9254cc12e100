//! Integration tests for the BullsAI API.
//!
//! Drives the full router (middleware included) with `oneshot`. Each test
//! builds its own state.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use bulls_api::create_router;
use bulls_api::error::INTERNAL_ERROR_MESSAGE;
use bulls_api::handlers::{HealthResponse, WelcomeResponse};
use bulls_api::state::AppState;
use bulls_chat::knowledge::{default_answer_pool, FINANCIAL_ANSWER, MARKET_ANSWER};
use bulls_chat::{AnswerResolver, Classification, Classifier};
use bulls_core::config::{BullsConfig, FallbackPolicy};
use bulls_core::{ChatResponse, NO_CONFIDENT_ANSWER_MESSAGE};

// =============================================================================
// Helpers
// =============================================================================

fn make_app() -> axum::Router {
    create_router(AppState::new(BullsConfig::default()))
}

fn make_app_with(config: BullsConfig) -> axum::Router {
    create_router(AppState::new(config))
}

/// Build a POST /api/chat request with a raw JSON body.
fn chat_request(json: &str) -> Request<Body> {
    Request::post("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

/// Read full response body bytes.
async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn error_code(resp: axum::response::Response) -> String {
    let bytes = body_bytes(resp).await;
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    json["error"].as_str().unwrap_or_default().to_string()
}

struct PanickingClassifier;

impl Classifier for PanickingClassifier {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn classify(&self, _text: &str) -> Classification {
        panic!("classifier blew up: secret-internal-detail");
    }
}

// =============================================================================
// Public endpoints
// =============================================================================

#[tokio::test]
async fn test_root_welcome() {
    let resp = make_app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let welcome: WelcomeResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(welcome.message.contains("BullsAI"));
}

#[tokio::test]
async fn test_health_happy_path() {
    let resp = make_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, "BullsAI Backend");
    assert_eq!(health.classifier, "hybrid");
}

#[tokio::test]
async fn test_chat_rejects_get() {
    let resp = make_app()
        .oneshot(Request::get("/api/chat").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// POST /api/chat - answers
// =============================================================================

#[tokio::test]
async fn test_chat_revenue_returns_financial_answer() {
    let resp = make_app()
        .oneshot(chat_request(r#"{"message":"What were the revenue numbers?"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let chat: ChatResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(chat.response, FINANCIAL_ANSWER);
    assert_eq!(chat.session_id.as_deref(), Some("default"));
    assert!(chat.sources.is_empty());
    assert!(chat.intent.is_some_and(|i| i.needs_financial_data));
}

#[tokio::test]
async fn test_chat_is_case_insensitive() {
    let resp = make_app()
        .oneshot(chat_request(r#"{"message":"MARKET outlook?"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let chat: ChatResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(chat.response, MARKET_ANSWER);
}

#[tokio::test]
async fn test_chat_retrieval_answer_carries_sources() {
    let resp = make_app()
        .oneshot(chat_request(
            r#"{"message":"Tell me about the debt on the balance sheet"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let chat: ChatResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(chat.sources, vec!["kb/balance-sheet".to_string()]);
    let confidence = chat.confidence.unwrap();
    assert!((0.0..=1.0).contains(&confidence));
}

#[tokio::test]
async fn test_chat_session_id_echoed_and_ignored() {
    let app = make_app();
    let first = app
        .clone()
        .oneshot(chat_request(
            r#"{"message":"Tell me about sustainability","session_id":"abc-123"}"#,
        ))
        .await
        .unwrap();
    let second = app
        .oneshot(chat_request(
            r#"{"message":"Tell me about sustainability","session_id":"zzz"}"#,
        ))
        .await
        .unwrap();

    let a: ChatResponse = serde_json::from_slice(&body_bytes(first).await).unwrap();
    let b: ChatResponse = serde_json::from_slice(&body_bytes(second).await).unwrap();
    assert_eq!(a.session_id.as_deref(), Some("abc-123"));
    assert_eq!(b.session_id.as_deref(), Some("zzz"));
    assert_eq!(a.response, b.response);
}

#[tokio::test]
async fn test_chat_no_match_declines_with_422() {
    let resp = make_app()
        .oneshot(chat_request(r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(json["error"], "low_confidence");
    assert_eq!(json["message"], NO_CONFIDENT_ANSWER_MESSAGE);
}

#[tokio::test]
async fn test_chat_no_match_pool_policy_returns_pool_member() {
    let mut config = BullsConfig::default();
    config.chat.fallback = FallbackPolicy::Pool;

    let resp = make_app_with(config)
        .oneshot(chat_request(r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let chat: ChatResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(default_answer_pool().contains(&chat.response));
}

// =============================================================================
// POST /api/chat - error paths
// =============================================================================

#[tokio::test]
async fn test_chat_missing_message_returns_400() {
    let resp = make_app().oneshot(chat_request("{}")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(resp).await, "bad_request");
}

#[tokio::test]
async fn test_chat_blank_messages_return_400() {
    for body in [r#"{"message":""}"#, r#"{"message":"   \n\t"}"#] {
        let resp = make_app().oneshot(chat_request(body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {}", body);
    }
}

#[tokio::test]
async fn test_chat_malformed_json_returns_400() {
    let resp = make_app().oneshot(chat_request("{not json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_wrong_field_type_returns_400() {
    let resp = make_app()
        .oneshot(chat_request(r#"{"message":42}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_message_too_long_returns_400() {
    let long = "a".repeat(2001);
    let resp = make_app()
        .oneshot(chat_request(&format!(r#"{{"message":"{}"}}"#, long)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_oversized_body_returns_413() {
    let huge = "a".repeat(70 * 1024);
    let resp = make_app()
        .oneshot(chat_request(&format!(r#"{{"message":"{}"}}"#, huge)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_code(resp).await, "payload_too_large");
}

#[tokio::test]
async fn test_chat_disabled_returns_503() {
    let mut config = BullsConfig::default();
    config.chat.enabled = false;

    let resp = make_app_with(config)
        .oneshot(chat_request(r#"{"message":"revenue?"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_code(resp).await, "service_unavailable");
}

#[tokio::test]
async fn test_chat_internal_fault_returns_generic_500() {
    let config = BullsConfig::default();
    let resolver = AnswerResolver::with_classifier(Box::new(PanickingClassifier), &config.chat);
    let app = create_router(AppState::with_resolver(config, resolver));

    let resp = app
        .oneshot(chat_request(r#"{"message":"revenue?"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = body_bytes(resp).await;
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"], "internal_error");
    assert_eq!(json["message"], INTERNAL_ERROR_MESSAGE);
    assert!(!String::from_utf8_lossy(&bytes).contains("secret-internal-detail"));
}

// =============================================================================
// Middleware
// =============================================================================

#[tokio::test]
async fn test_cors_preflight_allows_frontend_origin() {
    let resp = make_app()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/chat")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let resp = make_app()
        .oneshot(
            Request::get("/health")
                .header("origin", "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.headers().get("access-control-allow-origin").is_none());
}
