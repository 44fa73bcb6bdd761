//! Events that can occur in a session

use serde::{Deserialize, Serialize};

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserSubmit {
        text: String,
    },
    Reset,

    // Backend events
    RiddleLoaded {
        riddle_id: u32,
        response: RiddleResponse,
    },
    AnswerChecked {
        response: AnswerResponse,
    },
    /// The exchange could not be completed or decoded
    RequestFailed,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::UserSubmit { .. } => "user_submit",
            Event::Reset => "reset",
            Event::RiddleLoaded { .. } => "riddle_loaded",
            Event::AnswerChecked { .. } => "answer_checked",
            Event::RequestFailed => "request_failed",
        }
    }
}

/// Backend reply to a riddle lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiddleResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub riddle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
impl RiddleResponse {
    pub fn found(riddle: impl Into<String>) -> Self {
        Self {
            success: true,
            riddle: Some(riddle.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            riddle: None,
            error: Some(error.into()),
        }
    }
}

/// Backend verdict on an answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
impl AnswerResponse {
    pub fn accepted(response: impl Into<String>) -> Self {
        Self {
            success: true,
            response: Some(response.into()),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(error.into()),
        }
    }
}

/// Request body for an answer submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}
