//! HTTP entrypoint binding inbound requests to the interaction pipeline.
//!
//! The raw body is read exactly once; signature verification and JSON
//! parsing both operate on those same bytes.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use tracing::{error, warn};

use taskbridge_channels::discord::{verify_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use taskbridge_channels::dispatch::dispatch_interaction;
use taskbridge_core::{BridgeError, Interaction, TaskCreator};

/// Liveness text for manual checks.
pub const LIVENESS_TEXT: &str = "Task bridge is running!";

/// State shared across requests; read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub public_key_hex: String,
    pub tasks: Arc<dyn TaskCreator>,
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new().route("/", any(handle_root)).with_state(state)
}

/// Single entrypoint: GET answers the liveness check, POST runs the
/// interaction pipeline, anything else is a 400.
async fn handle_root(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::GET {
        (StatusCode::OK, LIVENESS_TEXT).into_response()
    } else if method == Method::POST {
        handle_interaction(&state, &headers, &body).await
    } else {
        (StatusCode::BAD_REQUEST, "Invalid request").into_response()
    }
}

async fn handle_interaction(state: &AppState, headers: &HeaderMap, body: &Bytes) -> Response {
    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    let timestamp = headers.get(TIMESTAMP_HEADER).and_then(|v| v.to_str().ok());
    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        warn!("interaction request without signature headers");
        return (StatusCode::UNAUTHORIZED, "Invalid request signature").into_response();
    };

    if !verify_signature(body, signature, timestamp, &state.public_key_hex) {
        warn!("rejecting interaction with invalid signature");
        return (StatusCode::UNAUTHORIZED, "Invalid request signature").into_response();
    }

    let interaction = match Interaction::from_bytes(body) {
        Ok(interaction) => interaction,
        Err(err) => {
            warn!(error = %err, "interaction body is not valid JSON");
            return (StatusCode::BAD_REQUEST, "Invalid request").into_response();
        }
    };

    match dispatch_interaction(&interaction, state.tasks.as_ref()).await {
        Ok(response) => Json(response).into_response(),
        Err(BridgeError::UnsupportedInteraction | BridgeError::MalformedPayload(_)) => {
            (StatusCode::BAD_REQUEST, "Invalid request").into_response()
        }
        Err(err) => {
            error!(error = %err, "interaction handling failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use ed25519_dalek::{Signer, SigningKey};
    use serde_json::{json, Value};
    use taskbridge_core::{CreatedTask, TaskRequest};
    use tower::ServiceExt;

    struct StubTasks {
        calls: AtomicUsize,
    }

    impl StubTasks {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TaskCreator for StubTasks {
        async fn create_task(&self, _req: &TaskRequest) -> Result<CreatedTask, BridgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CreatedTask::default())
        }
    }

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    fn test_app(stub: Arc<StubTasks>) -> Router {
        build_router(AppState {
            public_key_hex: hex::encode(signing_key().verifying_key().as_bytes()),
            tasks: stub,
        })
    }

    fn signed_request(body: &str) -> Request<Body> {
        let timestamp = "1700000000";
        let mut message = timestamp.as_bytes().to_vec();
        message.extend_from_slice(body.as_bytes());
        let signature = hex::encode(signing_key().sign(&message).to_bytes());

        Request::builder()
            .method("POST")
            .uri("/")
            .header(SIGNATURE_HEADER, signature)
            .header(TIMESTAMP_HEADER, timestamp)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn get_returns_liveness_text() {
        let app = test_app(StubTasks::new());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], LIVENESS_TEXT.as_bytes());
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let app = test_app(StubTasks::new());
        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_signature_headers_are_unauthorized() {
        let stub = StubTasks::new();
        let app = test_app(stub.clone());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from(r#"{"type":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn invalid_signature_never_reaches_the_client() {
        let stub = StubTasks::new();
        let app = test_app(stub.clone());

        let body = json!({
            "type": 2,
            "data": {
                "name": "task",
                "options": [{ "value": "Fix bug" }, { "value": "desc" }]
            }
        })
        .to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(SIGNATURE_HEADER, hex::encode([0u8; 64]))
                    .header(TIMESTAMP_HEADER, "1700000000")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn signed_ping_is_acknowledged() {
        let app = test_app(StubTasks::new());
        let response = app.oneshot(signed_request(r#"{"type":1}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "type": 1 }));
    }

    #[tokio::test]
    async fn signed_task_command_creates_a_task() {
        let stub = StubTasks::new();
        let app = test_app(stub.clone());

        let body = json!({
            "type": 2,
            "data": {
                "name": "task",
                "options": [{ "value": "Fix bug" }, { "value": "desc" }]
            }
        })
        .to_string();

        let response = app.oneshot(signed_request(&body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["type"], 4);
        assert_eq!(json["data"]["content"], "Task \"Fix bug\" has been created!");
        assert_eq!(json["data"]["flags"], 64);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn signed_garbage_body_is_a_bad_request() {
        let app = test_app(StubTasks::new());
        let response = app.oneshot(signed_request("not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signed_unknown_interaction_is_a_bad_request() {
        let stub = StubTasks::new();
        let app = test_app(stub.clone());
        let response = app.oneshot(signed_request(r#"{"type":9}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(stub.call_count(), 0);
    }
}
