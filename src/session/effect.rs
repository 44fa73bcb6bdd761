//! Effects produced by state transitions

use super::state::Message;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a line to the transcript
    AppendMessage { message: Message },

    /// Drop every transcript line
    ClearTranscript,

    /// Look up a riddle upstream
    FetchRiddle { riddle_id: u32 },

    /// Send an answer upstream
    SubmitAnswer { riddle_id: u32, answer: String },
}

impl Effect {
    pub fn bot_says(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            message: Message::bot(text),
        }
    }

    pub fn user_says(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            message: Message::user(text),
        }
    }
}
