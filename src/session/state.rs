//! Session state types

use serde::{Deserialize, Serialize};

/// Lowest and highest riddle numbers the quest knows about
pub const MIN_RIDDLE_ID: u32 = 0;
pub const MAX_RIDDLE_ID: u32 = 40;

pub const GREETING: &str = "Greetings, participant!

I am the riddle-bot, your digital guide in this challenge.

My protocols are designed to present you with a series of riddles. Your goal is to solve them to unlock a specific Microsoft 365 tool and move on to the next phase of the challenge.

Once you've unlocked your tool, you'll be given a problem to solve. Use your creativity to come up with a unique solution!

Need a hint or have a question? Just ask. I'm ready when you are.";

pub const RIDDLE_PROMPT: &str = "Enter Riddle number (0-40):";
pub const ANSWER_PROMPT: &str = "Enter your answer:";
pub const INVALID_NUMBER: &str = "Please enter a valid number between 0 and 40.";
pub const FALLBACK_ERROR: &str = "Error";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong.";

// ============================================================================
// Transcript
// ============================================================================

/// Who wrote a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Bot,
    User,
}

/// A single transcript line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }
}

/// Messages every fresh or reset session starts with
pub fn greeting_messages() -> Vec<Message> {
    vec![Message::bot(GREETING), Message::bot(RIDDLE_PROMPT)]
}

// ============================================================================
// Session State
// ============================================================================

/// Where the conversation stands. The riddle being answered lives only in
/// `AwaitingAnswer`, so there is never a stale id while awaiting a number.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    AwaitingRiddleNumber,
    AwaitingAnswer { riddle_id: u32 },
}

impl SessionState {
    /// The riddle currently being answered, if any
    pub fn current_riddle_id(&self) -> Option<u32> {
        match self {
            SessionState::AwaitingRiddleNumber => None,
            SessionState::AwaitingAnswer { riddle_id } => Some(*riddle_id),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::AwaitingRiddleNumber => "awaiting_riddle_number",
            SessionState::AwaitingAnswer { .. } => "awaiting_answer",
        }
    }
}

/// Serializable view of one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub state: SessionState,
    pub messages: Vec<Message>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: SessionState::default(),
            messages: greeting_messages(),
        }
    }
}

/// Parse a riddle number the way a browser's `parseInt(text, 10)` would:
/// optional sign, then the leading run of digits; anything after is ignored.
/// Returns `None` when there is no number or it falls outside the quest.
pub fn parse_riddle_number(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let mut digits = rest.bytes().take_while(u8::is_ascii_digit).peekable();
    digits.peek()?;

    let value = digits.try_fold(0u32, |acc, b| {
        acc.checked_mul(10)?.checked_add(u32::from(b - b'0'))
    });

    match value {
        // "-0" parses to zero, which is a valid riddle
        Some(0) => Some(0),
        Some(_) if negative => None,
        Some(n) if (MIN_RIDDLE_ID..=MAX_RIDDLE_ID).contains(&n) => Some(n),
        _ => None,
    }
}
