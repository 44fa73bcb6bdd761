//! Property-based tests for the session state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::state::*;
use super::transition::*;
use super::*;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Apply effects that touch the transcript, the way the runtime does
fn apply_transcript(messages: &mut Vec<Message>, effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::AppendMessage { message } => messages.push(message.clone()),
            Effect::ClearTranscript => messages.clear(),
            Effect::FetchRiddle { .. } | Effect::SubmitAnswer { .. } => {}
        }
    }
}

fn is_backend_call(effect: &Effect) -> bool {
    matches!(
        effect,
        Effect::FetchRiddle { .. } | Effect::SubmitAnswer { .. }
    )
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_state() -> impl Strategy<Value = SessionState> {
    prop_oneof![
        Just(SessionState::AwaitingRiddleNumber),
        (MIN_RIDDLE_ID..=MAX_RIDDLE_ID)
            .prop_map(|riddle_id| SessionState::AwaitingAnswer { riddle_id }),
    ]
}

fn arb_message() -> impl Strategy<Value = Message> {
    ("[a-zA-Z0-9 ?!]{0,40}", any::<bool>()).prop_map(|(text, from_bot)| {
        if from_bot {
            Message::bot(text)
        } else {
            Message::user(text)
        }
    })
}

fn arb_transcript() -> impl Strategy<Value = Vec<Message>> {
    proptest::collection::vec(arb_message(), 0..12)
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n\r]{0,8}"
}

/// Text that is not a riddle number: no leading digit, or a number past the end
fn arb_invalid_number() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z?!][a-zA-Z0-9 ]{0,10}",
        (MAX_RIDDLE_ID + 1..100_000u32).prop_map(|n| n.to_string()),
        (1..100_000u32).prop_map(|n| format!("-{n}")),
    ]
}

fn arb_riddle_response() -> impl Strategy<Value = RiddleResponse> {
    (
        any::<bool>(),
        proptest::option::of("[a-zA-Z ]{0,30}"),
        proptest::option::of("[a-zA-Z ]{0,30}"),
    )
        .prop_map(|(success, riddle, error)| RiddleResponse {
            success,
            riddle,
            error,
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn blank_input_is_a_no_op(state in arb_state(), text in arb_blank()) {
        let result = transition(&state, Event::UserSubmit { text }).unwrap();
        prop_assert_eq!(result.new_state, state);
        prop_assert!(result.effects.is_empty());
    }

    #[test]
    fn invalid_numbers_never_select_a_riddle(text in arb_invalid_number()) {
        let state = SessionState::AwaitingRiddleNumber;
        let result = transition(&state, Event::UserSubmit { text }).unwrap();

        prop_assert_eq!(result.new_state, SessionState::AwaitingRiddleNumber);
        prop_assert_eq!(result.new_state.current_riddle_id(), None);
        prop_assert!(!result.effects.iter().any(is_backend_call));
        prop_assert_eq!(
            result.effects.last(),
            Some(&Effect::bot_says(INVALID_NUMBER))
        );
    }

    #[test]
    fn every_valid_number_fetches_that_riddle(n in MIN_RIDDLE_ID..=MAX_RIDDLE_ID) {
        let result = transition(
            &SessionState::AwaitingRiddleNumber,
            Event::UserSubmit { text: n.to_string() },
        ).unwrap();

        prop_assert_eq!(result.new_state, SessionState::AwaitingRiddleNumber);
        prop_assert_eq!(
            result.effects,
            vec![Effect::user_says(n.to_string()), Effect::FetchRiddle { riddle_id: n }]
        );
    }

    #[test]
    fn reset_restores_greeting_from_anywhere(
        state in arb_state(),
        mut transcript in arb_transcript(),
    ) {
        let result = transition(&state, Event::Reset).unwrap();
        apply_transcript(&mut transcript, &result.effects);

        prop_assert_eq!(result.new_state, SessionState::AwaitingRiddleNumber);
        prop_assert_eq!(transcript, greeting_messages());
    }

    #[test]
    fn riddle_id_present_only_when_awaiting_answer(
        riddle_id in MIN_RIDDLE_ID..=MAX_RIDDLE_ID,
        response in arb_riddle_response(),
    ) {
        let success = response.success;
        let result = transition(
            &SessionState::AwaitingRiddleNumber,
            Event::RiddleLoaded { riddle_id, response },
        ).unwrap();

        if success {
            prop_assert_eq!(result.new_state, SessionState::AwaitingAnswer { riddle_id });
        } else {
            prop_assert_eq!(result.new_state, SessionState::AwaitingRiddleNumber);
        }
        prop_assert_eq!(
            result.new_state.current_riddle_id().is_some(),
            matches!(result.new_state, SessionState::AwaitingAnswer { .. })
        );
    }

    #[test]
    fn transitions_only_append_or_reset(
        state in arb_state(),
        text in "[a-zA-Z0-9 ]{0,20}",
        mut transcript in arb_transcript(),
    ) {
        let before = transcript.clone();
        let result = transition(&state, Event::UserSubmit { text }).unwrap();
        apply_transcript(&mut transcript, &result.effects);

        prop_assert!(!result.effects.contains(&Effect::ClearTranscript));
        prop_assert!(transcript.starts_with(&before));
    }

    #[test]
    fn transport_failure_never_moves_state(state in arb_state()) {
        let result = transition(&state, Event::RequestFailed).unwrap();
        prop_assert_eq!(result.new_state, state);
        prop_assert_eq!(result.effects, vec![Effect::bot_says(SOMETHING_WENT_WRONG)]);
    }
}
