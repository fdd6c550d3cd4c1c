//! Effects produced by state transitions

use crate::chat::ChatTurn;
use crate::client::ChatRequest;
use crate::runtime::NoticeKind;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Draw a message bubble
    RenderTurn { turn: ChatTurn },

    /// Append a turn to history (flushes to storage)
    RecordTurn { turn: ChatTurn },

    ShowTyping,

    HideTyping,

    /// Post the message to the chat endpoint; the reply comes back as an event
    SendRequest { request: ChatRequest },

    /// Transient system notice
    ShowNotice { kind: NoticeKind, text: String },
}

impl Effect {
    /// Render and record the same turn
    pub fn show_and_record(turn: ChatTurn) -> [Self; 2] {
        [
            Effect::RenderTurn { turn: turn.clone() },
            Effect::RecordTurn { turn },
        ]
    }

    pub fn notice(kind: NoticeKind, text: impl Into<String>) -> Self {
        Effect::ShowNotice {
            kind,
            text: text.into(),
        }
    }

    pub fn error_notice(text: impl Into<String>) -> Self {
        Self::notice(NoticeKind::Error, text)
    }
}
