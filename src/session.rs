//! Riddle session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::{AnswerRequest, AnswerResponse, Event, RiddleResponse};
pub use state::{Message, Sender, Session, SessionState};
pub use transition::{transition, TransitionError};
