//! API request and response types

use crate::session::Session;
use serde::{Deserialize, Serialize};

/// Request to send a chat line
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response carrying a session snapshot
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
