use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::{Query, State, rejection::BytesRejection},
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
};
use gsm_core::platforms::messenger::{
    SIGNATURE_256_HEADER, SIGNATURE_HEADER, verify_handshake, verify_signature,
};
use gsm_core::decode_events;
use gsm_ingress_common::with_request_id;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::router::EventRouter;

#[derive(Clone)]
pub struct AppState {
    pub router: Arc<EventRouter>,
    pub app_secret: String,
    pub verify_token: String,
    pub strict_verify: bool,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/callback", get(verify).post(receive))
        .route("/healthz", get(healthz))
        .with_state(state)
        .layer(middleware::from_fn(with_request_id))
}

#[derive(Deserialize)]
struct VerifyQs {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
    #[serde(rename = "hub.verify_token")]
    token: Option<String>,
}

async fn verify(State(state): State<AppState>, Query(q): Query<VerifyQs>) -> impl IntoResponse {
    let challenge = q.challenge.unwrap_or_default();
    match verify_handshake(q.mode.as_deref(), q.token.as_deref(), &state.verify_token) {
        Ok(()) => (StatusCode::OK, challenge),
        Err(err) if state.strict_verify => {
            warn!(error = %err, "webhook handshake rejected");
            (StatusCode::FORBIDDEN, "forbidden".to_string())
        }
        Err(err) => {
            warn!(error = %err, "webhook handshake failed verification; answering anyway");
            (StatusCode::OK, challenge)
        }
    }
}

/// Answers 200 for every delivery, dropped ones included. Bodies above axum's
/// default limit (2 MiB) are dropped unread.
async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> StatusCode {
    let body = match body {
        Ok(body) => body,
        Err(err) => {
            warn!(error = %err, "dropping unreadable webhook body");
            return StatusCode::OK;
        }
    };
    let signature = headers
        .get(SIGNATURE_256_HEADER)
        .or_else(|| headers.get(SIGNATURE_HEADER))
        .and_then(|v| v.to_str().ok());
    if let Err(err) = verify_signature(&state.app_secret, &body, signature) {
        warn!(error = %err, "dropping webhook with invalid signature");
        return StatusCode::OK;
    }

    let events = match decode_events(&body) {
        Ok(events) => events,
        Err(err) => {
            warn!(error = %err, "dropping undecodable webhook");
            return StatusCode::OK;
        }
    };
    debug!(count = events.len(), "webhook decoded");

    for event in &events {
        state.router.dispatch(event).await;
    }
    StatusCode::OK
}

async fn healthz() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
