//! REST API Server for the Scam Honeypot
//!
//! Thin transport wrapper over the engagement engine: routes, API-key
//! check, and tolerant body handling. Every normal path answers 200 with a
//! `{status, reply}` body; only a credential failure is an error status.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

use crate::adapter;
use crate::engine::HoneypotEngine;

const GREETING_REPLY: &str = "Hello! How can I help you today?";
const NONCOMMITTAL_REPLY: &str = "I see. Can you explain more about this?";

/// =============================
/// Response Model
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiReply {
    pub status: String,
    pub reply: String,
}

impl ApiReply {
    pub fn success(reply: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            reply: reply.into(),
        }
    }

    pub fn error(reply: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            reply: reply.into(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<HoneypotEngine>,
    pub api_key: Arc<String>,
}

/// =============================
/// Auth
/// =============================

/// Check the `x-api-key` header before any core logic runs.
fn check_api_key(headers: &HeaderMap, expected: &str) -> Result<(), (StatusCode, Json<ApiReply>)> {
    let provided = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if provided.is_empty() {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ApiReply::error("Missing API key")),
        ));
    }
    if provided != expected {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiReply::error("Invalid API key")),
        ));
    }
    Ok(())
}

/// =============================
/// Info Endpoints
/// =============================

async fn root() -> Json<Value> {
    Json(serde_json::json!({
        "status": "success",
        "message": "Honeypot API is running. Use POST /api/analyze-message to detect scams."
    }))
}

async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn analyze_hint() -> Json<Value> {
    Json(serde_json::json!({
        "status": "success",
        "message": "This endpoint accepts POST requests with a message to analyze.",
        "example": {"message": "Your account will be blocked"}
    }))
}

/// =============================
/// Analyze Endpoint
/// =============================

async fn analyze_message(
    State(state): State<ApiState>,
    headers: HeaderMap,
    raw_body: String,
) -> (StatusCode, Json<ApiReply>) {
    if let Err(rejection) = check_api_key(&headers, &state.api_key) {
        return rejection;
    }

    // Tolerate anything: a non-JSON body still gets a conversational reply
    // and never touches session state.
    let body: Value = match serde_json::from_str(&raw_body) {
        Ok(v) => v,
        Err(e) => {
            warn!("Unparseable request body ({} bytes): {}", raw_body.len(), e);
            let reply = if raw_body.trim().is_empty() {
                GREETING_REPLY
            } else {
                NONCOMMITTAL_REPLY
            };
            return (StatusCode::OK, Json(ApiReply::success(reply)));
        }
    };

    let inbound = adapter::extract_message(&body);
    if !inbound.prior_turns.is_empty() {
        debug!(
            "Session {}: body carried {} prior turn(s)",
            inbound.session_id,
            inbound.prior_turns.len()
        );
    }

    // Blank text never creates or mutates a session.
    let Some(text) = inbound.text else {
        return (StatusCode::OK, Json(ApiReply::success(GREETING_REPLY)));
    };

    info!("Session {}: processing turn", inbound.session_id);
    let outcome = state
        .engine
        .process_message(&inbound.session_id, text.trim())
        .await;

    (StatusCode::OK, Json(ApiReply::success(outcome.reply)))
}

/// =============================
/// Router
/// =============================

pub fn create_router(engine: Arc<HoneypotEngine>, api_key: String) -> Router {
    let state = ApiState {
        engine,
        api_key: Arc::new(api_key),
    };

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/analyze-message", get(analyze_hint).post(analyze_message))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    engine: Arc<HoneypotEngine>,
    api_key: String,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(engine, api_key);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("Honeypot API listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::{CallbackDispatcher, IntakeSink};
    use crate::models::CallbackPayload;
    use crate::responder::PersonaResponder;
    use crate::session::InMemorySessionStore;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    struct NullSink;

    #[async_trait::async_trait]
    impl IntakeSink for NullSink {
        async fn deliver(&self, _payload: &CallbackPayload) -> crate::error::Result<()> {
            Ok(())
        }
    }

    fn test_engine() -> Arc<HoneypotEngine> {
        Arc::new(HoneypotEngine::new(
            Box::new(InMemorySessionStore::new()),
            PersonaResponder::with_seed(1),
            CallbackDispatcher::start(Arc::new(NullSink), 1, 4, 10),
            3,
        ))
    }

    async fn post_analyze(router: Router, body: &str) -> (StatusCode, ApiReply) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze-message")
            .header("x-api-key", "secret")
            .body(Body::from(body.to_string()))
            .expect("request");

        let response = router.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let reply: ApiReply = serde_json::from_slice(&bytes).expect("json reply");
        (status, reply)
    }

    #[tokio::test]
    async fn test_empty_body_gets_greeting_without_session() {
        let engine = test_engine();
        let router = create_router(Arc::clone(&engine), "secret".to_string());

        let (status, reply) = post_analyze(router, "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply.status, "success");
        assert_eq!(reply.reply, GREETING_REPLY);
        assert_eq!(engine.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_non_json_body_gets_stock_reply_without_session() {
        let engine = test_engine();
        let router = create_router(Arc::clone(&engine), "secret".to_string());

        let (status, reply) = post_analyze(router, "this is not json at all").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply.reply, NONCOMMITTAL_REPLY);
        assert_eq!(engine.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_blank_text_gets_greeting_without_session() {
        let engine = test_engine();
        let router = create_router(Arc::clone(&engine), "secret".to_string());

        let (status, reply) =
            post_analyze(router, r#"{"sessionId": "S1", "text": "   "}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply.reply, GREETING_REPLY);
        assert_eq!(engine.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_real_message_reaches_engine() {
        let engine = test_engine();
        let router = create_router(Arc::clone(&engine), "secret".to_string());

        let (status, reply) =
            post_analyze(router, r#"{"sessionId": "S1", "message": "your account is blocked"}"#)
                .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply.status, "success");
        assert!(!reply.reply.is_empty());
        assert_eq!(engine.session_count().await, 1);
    }

    #[test]
    fn test_missing_api_key() {
        let headers = HeaderMap::new();
        let err = check_api_key(&headers, "secret").unwrap_err();
        assert_eq!(err.0, StatusCode::UNAUTHORIZED);
        assert_eq!(err.1 .0.reply, "Missing API key");
    }

    #[test]
    fn test_wrong_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "nope".parse().unwrap());
        let err = check_api_key(&headers, "secret").unwrap_err();
        assert_eq!(err.0, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_valid_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", "secret".parse().unwrap());
        assert!(check_api_key(&headers, "secret").is_ok());
    }
}
