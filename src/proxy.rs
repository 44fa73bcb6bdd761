//! Relay between the UI and the upstream riddle service
//!
//! Both operations pass the upstream JSON through untouched with status 200,
//! and collapse every failure into one fixed payload with status 500.

use crate::backend::RiddleBackend;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

pub const FETCH_FAILED: &str = "Failed to fetch riddle";
pub const SUBMIT_FAILED: &str = "Failed to submit answer";

/// What a proxy operation answers with
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyReply {
    pub status: StatusCode,
    pub body: Value,
}

impl ProxyReply {
    fn relay(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body,
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "success": false, "error": message }),
        }
    }
}

impl IntoResponse for ProxyReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Shared relay over a backend
#[derive(Clone)]
pub struct RiddleProxy {
    backend: Arc<dyn RiddleBackend>,
}

impl RiddleProxy {
    pub fn new(backend: Arc<dyn RiddleBackend>) -> Self {
        Self { backend }
    }

    pub async fn fetch_riddle(&self, id: &str) -> ProxyReply {
        match self.backend.get_riddle(id).await {
            Ok(body) => ProxyReply::relay(body),
            Err(_) => ProxyReply::failure(FETCH_FAILED),
        }
    }

    /// Relay a raw request body; anything that is not JSON fails the same
    /// way an unreachable backend does.
    pub async fn submit_answer(&self, id: &str, raw_body: &[u8]) -> ProxyReply {
        match serde_json::from_slice::<Value>(raw_body) {
            Ok(body) => self.submit_json(id, &body).await,
            Err(e) => {
                tracing::warn!(riddle_id = %id, error = %e, "Rejected non-JSON answer body");
                ProxyReply::failure(SUBMIT_FAILED)
            }
        }
    }

    pub async fn submit_json(&self, id: &str, body: &Value) -> ProxyReply {
        match self.backend.post_answer(id, body).await {
            Ok(body) => ProxyReply::relay(body),
            Err(_) => ProxyReply::failure(SUBMIT_FAILED),
        }
    }
}
