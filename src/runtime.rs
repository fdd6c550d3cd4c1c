//! Runtime for driving a conversation
//!
//! The controller executes state machine effects against injected
//! capabilities: a [`Renderer`], a [`PersistenceStore`] and a [`ChatClient`].

mod controller;
mod file_store;
mod terminal;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use controller::{CancelHandle, ControllerOptions, ConversationController, DEFAULT_REQUEST_TIMEOUT};
pub use file_store::FilePersistence;
pub use terminal::{markup_to_ansi, TerminalRenderer};
pub use traits::*;

use crate::chat::{ChatTurn, Role};
use crate::format::{confidence_label, format_message, tag_label};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Default lifetime of a system notice
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

/// Severity of a system notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticeKind::Info => "info",
            NoticeKind::Success => "success",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        }
    }
}

/// Transient message from the client itself, not part of the conversation
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Unique per controller, passed back to [`Renderer::dismiss_notice`]
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
    /// The controller dismisses the notice after this long
    pub ttl: Duration,
}

/// Confidence/tag badge shown under a bot reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// e.g. `90.0%`
    pub confidence: String,
    /// e.g. `#greeting`
    pub tag: Option<String>,
}

/// A turn prepared for display
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTurn {
    pub turn_id: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    /// Escaped, lightly styled HTML
    pub markup: String,
    pub badge: Option<Badge>,
    pub is_error: bool,
}

impl RenderedTurn {
    pub fn from_turn(turn: &ChatTurn) -> Self {
        // Error replies and zero-confidence replies carry no badge
        let badge = match (turn.role, turn.is_error, turn.confidence) {
            (Role::Bot, false, Some(confidence)) if confidence > 0.0 => Some(Badge {
                confidence: confidence_label(confidence),
                tag: turn.tag.as_deref().map(tag_label),
            }),
            _ => None,
        };
        Self {
            turn_id: turn.id.clone(),
            role: turn.role,
            timestamp: turn.timestamp,
            markup: format_message(&turn.content),
            badge,
            is_error: turn.is_error,
        }
    }
}
