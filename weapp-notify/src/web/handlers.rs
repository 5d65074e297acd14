//! Notification endpoint handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::GatewayError;
use crate::gateway::{Gateway, GatewayRequest};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

/// Build the router with the notify route mounted at `notify_path`.
pub fn router(state: AppState, notify_path: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(notify_path, any(notify))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Notify Endpoint
// =============================================================================

/// Notification endpoint.
///
/// `GET` answers the verification handshake, `POST` delivers a
/// notification. Anything the gateway rejects gets an empty body.
pub async fn notify(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let request = GatewayRequest {
        method,
        query,
        content_type,
        body: body.to_vec(),
    };

    match state.gateway.serve(&request) {
        Ok(result) => {
            let mut response = Response::new(Body::from(result.body));

            if let Some(content_type) = result.content_type {
                match HeaderValue::from_str(&content_type) {
                    Ok(value) => {
                        response.headers_mut().insert(CONTENT_TYPE, value);
                    }
                    Err(_) => warn!(content_type = %content_type, "notify_content_type_invalid"),
                }
            }

            response
        }
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                error!(error = %e, method = %request.method, "notify_request_failed");
            } else {
                warn!(error = %e, method = %request.method, "notify_request_rejected");
            }
            status.into_response()
        }
    }
}

/// Status code for a gateway error.
pub fn status_for(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::InvalidSignature | GatewayError::InvalidSource => StatusCode::UNAUTHORIZED,
        GatewayError::UnsupportedContentType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        GatewayError::Decode(_) | GatewayError::Decrypt(_) | GatewayError::UnexpectedType(_) => {
            StatusCode::BAD_REQUEST
        }
        GatewayError::InvalidMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
        GatewayError::InvalidKey(_) | GatewayError::Encode(_) | GatewayError::Encrypt(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::crypto::create_signature;
    use crate::dispatch::Handlers;
    use crate::gateway::GatewayConfig;

    const AES_KEY: &str = "abcdefghijklmnopqrstuvwxyz0123456789ABCDEFG";

    fn app(validate: bool) -> Router {
        let config = GatewayConfig::new("wxapp", "token", AES_KEY, validate).unwrap();
        let gateway = Gateway::new(config, Handlers::new());
        router(AppState::new(gateway), "/notify")
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(true)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_handshake_echoes() {
        let signature = create_signature(&["token", "1700000000", "nonce"]);
        let uri = format!(
            "/notify?echostr=abc123&signature={}&timestamp=1700000000&nonce=nonce",
            signature
        );

        let response = app(true)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "abc123");
    }

    #[tokio::test]
    async fn test_handshake_bad_signature() {
        let response = app(true)
            .oneshot(
                Request::get("/notify?echostr=abc123&signature=bad&timestamp=1&nonce=n")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_other_method_rejected() {
        let response = app(false)
            .oneshot(Request::delete("/notify").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_unknown_kind_is_bad_request() {
        let response = app(false)
            .oneshot(
                Request::post("/notify")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"MsgType":"voice"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_for() {
        assert_eq!(
            status_for(&GatewayError::InvalidSignature),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&GatewayError::Decrypt("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&GatewayError::UnsupportedContentType("text/plain".into())),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status_for(&GatewayError::Encode("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
