//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::proxy::RiddleProxy;
use crate::session::{AnswerRequest, AnswerResponse, RiddleResponse};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// The exchange with the riddle API could not be completed or understood
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to encode request: {0}")]
    Encode(String),
    #[error("Malformed reply: {0}")]
    Malformed(String),
}

/// Client the session runtime uses to reach riddles and verdicts
#[async_trait]
pub trait RiddleClient: Send + Sync {
    async fn fetch_riddle(&self, riddle_id: u32) -> Result<RiddleResponse, ClientError>;

    async fn submit_answer(
        &self,
        riddle_id: u32,
        answer: &str,
    ) -> Result<AnswerResponse, ClientError>;
}

// ============================================================================
// Production implementation
// ============================================================================

/// Goes through the same relay the `/api/riddles` routes use, so a backend
/// outage reads as "Failed to fetch riddle" in the transcript.
pub struct ProxyRiddleClient {
    proxy: RiddleProxy,
}

impl ProxyRiddleClient {
    pub fn new(proxy: RiddleProxy) -> Self {
        Self { proxy }
    }
}

/// Decode a relayed body whatever its status; generic failure payloads are
/// shaped like regular replies.
fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ClientError> {
    if !body.is_object() {
        return Err(ClientError::Malformed(format!(
            "expected a JSON object, got {body}"
        )));
    }
    serde_json::from_value(body).map_err(|e| ClientError::Malformed(e.to_string()))
}

#[async_trait]
impl RiddleClient for ProxyRiddleClient {
    async fn fetch_riddle(&self, riddle_id: u32) -> Result<RiddleResponse, ClientError> {
        let reply = self.proxy.fetch_riddle(&riddle_id.to_string()).await;
        decode(reply.body)
    }

    async fn submit_answer(
        &self,
        riddle_id: u32,
        answer: &str,
    ) -> Result<AnswerResponse, ClientError> {
        let body = serde_json::to_value(AnswerRequest {
            answer: answer.to_string(),
        })
        .map_err(|e| ClientError::Encode(e.to_string()))?;
        let reply = self.proxy.submit_json(&riddle_id.to_string(), &body).await;
        decode(reply.body)
    }
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: RiddleClient + ?Sized> RiddleClient for Arc<T> {
    async fn fetch_riddle(&self, riddle_id: u32) -> Result<RiddleResponse, ClientError> {
        (**self).fetch_riddle(riddle_id).await
    }

    async fn submit_answer(
        &self,
        riddle_id: u32,
        answer: &str,
    ) -> Result<AnswerResponse, ClientError> {
        (**self).submit_answer(riddle_id, answer).await
    }
}
