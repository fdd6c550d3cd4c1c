//! Conversation state types

use crate::chat::Session;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Conversation state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatState {
    /// Ready for user input, nothing in flight
    #[default]
    Idle,

    /// A message was sent and the reply has not arrived yet
    AwaitingResponse {
        /// Id of the user turn the pending reply answers
        pending_turn_id: String,
        sent_at: DateTime<Utc>,
    },
}

impl ChatState {
    /// The typing indicator is visible exactly while this is true
    pub fn is_awaiting(&self) -> bool {
        matches!(self, ChatState::AwaitingResponse { .. })
    }

    /// Turn id and send time of the request in flight
    pub fn pending(&self) -> Option<(&str, DateTime<Utc>)> {
        match self {
            ChatState::Idle => None,
            ChatState::AwaitingResponse {
                pending_turn_id,
                sent_at,
            } => Some((pending_turn_id.as_str(), *sent_at)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChatState::Idle => "idle",
            ChatState::AwaitingResponse { .. } => "awaiting_response",
        }
    }
}

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub session: Session,
}

impl ChatContext {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }
}
