//! Upstream riddle service abstraction
//!
//! The backend owns riddle content and answer checking; this crate only
//! relays JSON to it.

mod error;
mod http;

pub use error::{BackendError, BackendErrorKind};
pub use self::http::HttpBackend;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Common interface for the upstream riddle service
#[async_trait]
pub trait RiddleBackend: Send + Sync {
    /// `GET riddles/{id}`, returning the decoded body as-is
    async fn get_riddle(&self, id: &str) -> Result<Value, BackendError>;

    /// `POST riddles/{id}` with `body` as JSON, returning the decoded body as-is
    async fn post_answer(&self, id: &str, body: &Value) -> Result<Value, BackendError>;
}

/// Logging wrapper for backends
pub struct LoggingBackend {
    inner: Arc<dyn RiddleBackend>,
}

impl LoggingBackend {
    pub fn new(inner: Arc<dyn RiddleBackend>) -> Self {
        Self { inner }
    }

    fn log_outcome(
        operation: &str,
        id: &str,
        started: std::time::Instant,
        result: &Result<Value, BackendError>,
    ) {
        let duration = started.elapsed();
        match result {
            Ok(body) => {
                let upstream_success = body.get("success").and_then(Value::as_bool);
                tracing::info!(
                    operation,
                    riddle_id = %id,
                    duration_ms = %duration.as_millis(),
                    upstream_success,
                    "Backend request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    operation,
                    riddle_id = %id,
                    duration_ms = %duration.as_millis(),
                    kind = %e.kind,
                    error = %e.message,
                    "Backend request failed"
                );
            }
        }
    }
}

#[async_trait]
impl RiddleBackend for LoggingBackend {
    async fn get_riddle(&self, id: &str) -> Result<Value, BackendError> {
        let started = std::time::Instant::now();
        let result = self.inner.get_riddle(id).await;
        Self::log_outcome("get_riddle", id, started, &result);
        result
    }

    async fn post_answer(&self, id: &str, body: &Value) -> Result<Value, BackendError> {
        let started = std::time::Instant::now();
        let result = self.inner.post_answer(id, body).await;
        Self::log_outcome("post_answer", id, started, &result);
        result
    }
}
