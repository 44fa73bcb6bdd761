//! Pure state transition function
//!
//! Given the same state and event this always yields the same new state and
//! effects; all I/O happens in the runtime that executes the effects.

use super::state::{
    greeting_messages, parse_riddle_number, SessionState, ANSWER_PROMPT, FALLBACK_ERROR,
    INVALID_NUMBER, RIDDLE_PROMPT, SOMETHING_WENT_WRONG,
};
use super::{Effect, Event};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition: {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}

/// Backend error text, or the generic fallback when it is missing or blank
fn error_text(error: Option<String>) -> String {
    error
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR.to_string())
}

pub fn transition(
    state: &SessionState,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Reset is always available
        (_, Event::Reset) => Ok(TransitionResult::new(SessionState::AwaitingRiddleNumber)
            .with_effect(Effect::ClearTranscript)
            .with_effects(
                greeting_messages()
                    .into_iter()
                    .map(|message| Effect::AppendMessage { message }),
            )),

        // Blank input is dropped without a trace
        (_, Event::UserSubmit { text }) if text.trim().is_empty() => {
            Ok(TransitionResult::new(*state))
        }

        // ============================================================
        // Riddle selection
        // ============================================================
        (SessionState::AwaitingRiddleNumber, Event::UserSubmit { text }) => {
            let text = text.trim();
            let result = TransitionResult::new(*state).with_effect(Effect::user_says(text));
            Ok(match parse_riddle_number(text) {
                Some(riddle_id) => result.with_effect(Effect::FetchRiddle { riddle_id }),
                None => result.with_effect(Effect::bot_says(INVALID_NUMBER)),
            })
        }

        (SessionState::AwaitingRiddleNumber, Event::RiddleLoaded { riddle_id, response })
            if response.success =>
        {
            Ok(
                TransitionResult::new(SessionState::AwaitingAnswer { riddle_id })
                    .with_effect(Effect::bot_says(response.riddle.unwrap_or_default()))
                    .with_effect(Effect::bot_says(ANSWER_PROMPT)),
            )
        }

        // The looked-up id is dropped; only a served riddle is ever remembered
        (SessionState::AwaitingRiddleNumber, Event::RiddleLoaded { response, .. }) => {
            Ok(TransitionResult::new(*state)
                .with_effect(Effect::bot_says(error_text(response.error))))
        }

        // ============================================================
        // Answering
        // ============================================================
        (SessionState::AwaitingAnswer { riddle_id }, Event::UserSubmit { text }) => {
            let answer = text.trim().to_string();
            Ok(TransitionResult::new(*state)
                .with_effect(Effect::user_says(answer.clone()))
                .with_effect(Effect::SubmitAnswer {
                    riddle_id: *riddle_id,
                    answer,
                }))
        }

        (SessionState::AwaitingAnswer { .. }, Event::AnswerChecked { response })
            if response.success =>
        {
            Ok(TransitionResult::new(SessionState::AwaitingRiddleNumber)
                .with_effect(Effect::bot_says(response.response.unwrap_or_default()))
                .with_effect(Effect::bot_says(RIDDLE_PROMPT)))
        }

        (SessionState::AwaitingAnswer { .. }, Event::AnswerChecked { response }) => {
            Ok(TransitionResult::new(*state)
                .with_effect(Effect::bot_says(error_text(response.error))))
        }

        // ============================================================
        // Transport failures leave the session where it was
        // ============================================================
        (_, Event::RequestFailed) => {
            Ok(TransitionResult::new(*state).with_effect(Effect::bot_says(SOMETHING_WENT_WRONG)))
        }

        (state, event) => Err(TransitionError::InvalidTransition {
            state: state.name(),
            event: event.name(),
        }),
    }
}
