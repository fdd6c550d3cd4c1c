//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use crate::chat::Session;
use crate::client::ClientError;
use chrono::Utc;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ChatContext {
    ChatContext::new(Session::new())
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_idle_state() -> impl Strategy<Value = ChatState> {
    Just(ChatState::Idle)
}

fn arb_awaiting_state() -> impl Strategy<Value = ChatState> {
    "[a-z]{8}".prop_map(|pending_turn_id| ChatState::AwaitingResponse {
        pending_turn_id,
        sent_at: Utc::now(),
    })
}

fn arb_state() -> impl Strategy<Value = ChatState> {
    prop_oneof![arb_idle_state(), arb_awaiting_state()]
}

fn arb_valid_text() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,60}"
}

fn arb_submit_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_valid_text(),
        "[ \t\n]{0,10}",
        Just("y".repeat(crate::validation::MAX_MESSAGE_CHARS + 1)),
    ]
    .prop_map(|text| Event::submit(uuid::Uuid::new_v4().to_string(), text, Utc::now()))
}

fn arb_response_ok_event() -> impl Strategy<Value = Event> {
    ("[a-zA-Z ]{1,30}", proptest::option::of(0.0f64..=1.0), proptest::option::of("[a-z]{3,10}"))
        .prop_map(|(response, confidence, tag)| Event::ResponseOk {
            turn_id: uuid::Uuid::new_v4().to_string(),
            at: Utc::now(),
            response,
            confidence,
            tag,
        })
}

fn arb_response_error_event() -> impl Strategy<Value = Event> {
    "[a-zA-Z ]{1,30}".prop_map(|response| Event::ResponseError {
        turn_id: uuid::Uuid::new_v4().to_string(),
        at: Utc::now(),
        response,
    })
}

fn arb_client_error() -> impl Strategy<Value = ClientError> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(ClientError::network),
        "[a-z ]{1,20}".prop_map(ClientError::timeout),
        Just(ClientError::cancelled()),
        (400u16..600).prop_map(ClientError::http_status),
        "[a-z ]{1,20}".prop_map(ClientError::decode),
    ]
}

fn arb_network_failure_event() -> impl Strategy<Value = Event> {
    arb_client_error().prop_map(|error| Event::NetworkFailure { error })
}

fn arb_reply_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_response_ok_event(),
        arb_response_error_event(),
        arb_network_failure_event(),
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![arb_submit_event(), arb_reply_event()]
}

// ============================================================================
// Effect Checkers
// ============================================================================

fn count(effects: &[Effect], pred: impl Fn(&Effect) -> bool) -> usize {
    effects.iter().filter(|e| pred(e)).count()
}

fn effects_are_valid(effects: &[Effect], old_state: &ChatState, new_state: &ChatState) -> bool {
    let sends = count(effects, |e| matches!(e, Effect::SendRequest { .. }));
    let shows = count(effects, |e| matches!(e, Effect::ShowTyping));
    let hides = count(effects, |e| matches!(e, Effect::HideTyping));

    // A request goes out exactly when we start waiting, with the indicator
    let entering = !old_state.is_awaiting() && new_state.is_awaiting();
    let leaving = old_state.is_awaiting() && !new_state.is_awaiting();

    sends == usize::from(entering) && shows == usize::from(entering) && hides == usize::from(leaving)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: effects match the state change over any event sequence
    #[test]
    fn prop_effects_match_state_change(events in proptest::collection::vec(arb_event(), 0..20)) {
        let mut state = ChatState::Idle;
        let ctx = test_context();

        for event in events {
            match transition(&state, &ctx, event) {
                Ok(result) => {
                    prop_assert!(
                        effects_are_valid(&result.effects, &state, &result.new_state),
                        "Invalid effects {:?} for {:?} -> {:?}",
                        result.effects,
                        state,
                        result.new_state
                    );
                    state = result.new_state;
                }
                Err(_) => { /* Rejected transitions leave the state as is */ }
            }
        }
    }

    // Invariant 2: every reply returns to Idle
    #[test]
    fn prop_reply_always_returns_to_idle(state in arb_awaiting_state(), event in arb_reply_event()) {
        let result = transition(&state, &test_context(), event);
        prop_assert!(result.is_ok(), "Reply handling failed: {:?}", result);
        prop_assert_eq!(result.unwrap().new_state, ChatState::Idle);
    }

    // Invariant 3: submissions while awaiting are rejected
    #[test]
    fn prop_awaiting_rejects_submissions(state in arb_awaiting_state(), event in arb_submit_event()) {
        let result = transition(&state, &test_context(), event);
        prop_assert!(matches!(result, Err(TransitionError::Busy)));
    }

    // Invariant 4: transport failures never create a turn
    #[test]
    fn prop_network_failure_records_nothing(state in arb_awaiting_state(), event in arb_network_failure_event()) {
        let result = transition(&state, &test_context(), event).unwrap();
        prop_assert_eq!(count(&result.effects, |e| matches!(e, Effect::RecordTurn { .. })), 0);
        prop_assert_eq!(count(&result.effects, |e| matches!(e, Effect::ShowNotice { .. })), 1);
    }

    // Invariant 5: a server reply always records exactly one bot turn
    #[test]
    fn prop_server_reply_records_one_bot_turn(
        state in arb_awaiting_state(),
        event in prop_oneof![arb_response_ok_event(), arb_response_error_event()]
    ) {
        let result = transition(&state, &test_context(), event).unwrap();
        let bot_records = count(&result.effects, |e| {
            matches!(e, Effect::RecordTurn { turn } if !turn.is_user())
        });
        prop_assert_eq!(bot_records, 1);
    }

    // Invariant 6: valid text from Idle records the sanitized user turn
    #[test]
    fn prop_valid_submit_records_user_turn(text in arb_valid_text()) {
        let ctx = test_context();
        let event = Event::submit("turn", text.clone(), Utc::now());
        let result = transition(&ChatState::Idle, &ctx, event).unwrap();

        let recorded: Vec<_> = result.effects.iter().filter_map(|e| match e {
            Effect::RecordTurn { turn } => Some(turn),
            _ => None,
        }).collect();
        prop_assert_eq!(recorded.len(), 1);
        prop_assert!(recorded[0].is_user());
        prop_assert_eq!(&recorded[0].content, text.trim());
    }

    // Invariant 7: the transition is deterministic in its resulting state
    #[test]
    fn prop_transition_is_deterministic(state in arb_state(), event in arb_event()) {
        let ctx = test_context();
        let a = transition(&state, &ctx, event.clone());
        let b = transition(&state, &ctx, event);
        match (a, b) {
            (Ok(a), Ok(b)) => {
                prop_assert_eq!(a.new_state, b.new_state);
                prop_assert_eq!(a.effects, b.effects);
            }
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            _ => prop_assert!(false, "transition outcome differed between runs"),
        }
    }
}
