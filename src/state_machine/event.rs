//! Events that can occur in a conversation

use crate::client::{ChatResponse, ClientError};
use chrono::{DateTime, Utc};

/// Events that trigger state transitions.
///
/// Ids and timestamps are minted by the controller so the transition
/// function stays pure.
#[derive(Debug, Clone)]
pub enum Event {
    /// User submitted text
    Submit {
        turn_id: String,
        text: String,
        at: DateTime<Utc>,
    },

    /// Server replied with `status: "success"`
    ResponseOk {
        turn_id: String,
        at: DateTime<Utc>,
        response: String,
        confidence: Option<f64>,
        tag: Option<String>,
    },

    /// Server replied with any other application status
    ResponseError {
        turn_id: String,
        at: DateTime<Utc>,
        response: String,
    },

    /// Request could not complete (connection, non-2xx, timeout, cancel)
    NetworkFailure { error: ClientError },
}

impl Event {
    pub fn submit(turn_id: impl Into<String>, text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Event::Submit {
            turn_id: turn_id.into(),
            text: text.into(),
            at,
        }
    }

    /// Classify a decoded server reply
    pub fn from_response(response: ChatResponse, turn_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        let turn_id = turn_id.into();
        if response.is_success() {
            Event::ResponseOk {
                turn_id,
                at,
                response: response.response,
                confidence: response.confidence,
                tag: response.tag,
            }
        } else {
            Event::ResponseError {
                turn_id,
                at,
                response: response.response,
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::Submit { .. } => "submit",
            Event::ResponseOk { .. } => "response_ok",
            Event::ResponseError { .. } => "response_error",
            Event::NetworkFailure { .. } => "network_failure",
        }
    }
}
