//! Chat turns and session identity

use chrono::{DateTime, SecondsFormat, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

/// One message exchanged in the conversation.
///
/// Turns are immutable once built; the history store owns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurn {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub content: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default)]
    pub is_error: bool,
}

impl ChatTurn {
    pub fn user(id: impl Into<String>, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            timestamp: at,
            content: content.into(),
            role: Role::User,
            confidence: None,
            tag: None,
            is_error: false,
        }
    }

    pub fn bot(id: impl Into<String>, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            timestamp: at,
            content: content.into(),
            role: Role::Bot,
            confidence: None,
            tag: None,
            is_error: false,
        }
    }

    /// Attach classifier metadata; confidence is clamped to [0, 1]
    #[must_use]
    pub fn with_metadata(mut self, confidence: Option<f64>, tag: Option<String>) -> Self {
        self.confidence = confidence.filter(|c| c.is_finite()).map(|c| c.clamp(0.0, 1.0));
        self.tag = tag.filter(|t| !t.is_empty());
        self
    }

    #[must_use]
    pub fn into_error(mut self) -> Self {
        self.is_error = true;
        self
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// ISO-8601 timestamp as sent over the wire
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Generate a fresh turn identifier
pub fn new_turn_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Identity of one client run, used by the server to correlate requests.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(created_at: DateTime<Utc>) -> Self {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(9)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        Self {
            session_id: format!("session_{}_{suffix}", created_at.timestamp_millis()),
            created_at,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
