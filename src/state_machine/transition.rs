//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! result; all I/O happens when the controller executes the effects.

use super::{ChatContext, ChatState, Effect, Event};
use crate::chat::ChatTurn;
use crate::client::{ChatRequest, ClientError, ClientErrorKind};
use crate::validation::{self, ValidationError};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
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

/// Errors that can occur during transition. The state is unchanged.
#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("{0}")]
    Rejected(#[from] ValidationError),
    #[error("Still waiting for a reply, please wait a moment")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(
    state: &ChatState,
    context: &ChatContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // Idle + Submit -> AwaitingResponse
        (ChatState::Idle, Event::Submit { turn_id, text, at }) => {
            let text = text.trim();
            validation::check(text)?;
            let content = validation::sanitize(text);
            // Nothing but angle brackets
            if content.is_empty() {
                return Err(ValidationError::Empty.into());
            }

            let turn = ChatTurn::user(turn_id.clone(), content, at);
            let request = ChatRequest {
                message: turn.content.clone(),
                session_id: context.session_id().to_string(),
                timestamp: turn.timestamp_iso(),
            };

            Ok(TransitionResult::new(ChatState::AwaitingResponse {
                pending_turn_id: turn_id,
                sent_at: at,
            })
            .with_effects(Effect::show_and_record(turn))
            .with_effect(Effect::ShowTyping)
            .with_effect(Effect::SendRequest { request }))
        }

        // One request at a time
        (ChatState::AwaitingResponse { .. }, Event::Submit { .. }) => Err(TransitionError::Busy),

        // AwaitingResponse + ResponseOk -> Idle
        (
            ChatState::AwaitingResponse { .. },
            Event::ResponseOk {
                turn_id,
                at,
                response,
                confidence,
                tag,
            },
        ) => {
            let turn = ChatTurn::bot(turn_id, response, at).with_metadata(confidence, tag);
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::HideTyping)
                .with_effects(Effect::show_and_record(turn)))
        }

        // AwaitingResponse + ResponseError -> Idle, the error reply is still recorded
        (
            ChatState::AwaitingResponse { .. },
            Event::ResponseError {
                turn_id,
                at,
                response,
            },
        ) => {
            let turn = ChatTurn::bot(turn_id, response, at).into_error();
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::HideTyping)
                .with_effects(Effect::show_and_record(turn)))
        }

        // AwaitingResponse + NetworkFailure -> Idle, nothing recorded
        (ChatState::AwaitingResponse { .. }, Event::NetworkFailure { error }) => {
            Ok(TransitionResult::new(ChatState::Idle)
                .with_effect(Effect::HideTyping)
                .with_effect(Effect::error_notice(failure_notice(&error))))
        }

        (ChatState::Idle, event) => Err(TransitionError::InvalidTransition(format!(
            "{} while idle",
            event.name()
        ))),
    }
}

/// User-facing text for a transport failure
pub fn failure_notice(error: &ClientError) -> &'static str {
    match error.kind {
        ClientErrorKind::Timeout => "The server took too long to reply. Please try again.",
        ClientErrorKind::Cancelled => "Request cancelled.",
        ClientErrorKind::Network | ClientErrorKind::HttpStatus | ClientErrorKind::Decode => {
            "Connection error. Please try again."
        }
    }
}
