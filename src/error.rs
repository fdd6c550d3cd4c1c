//! Error types surfaced by the conversation controller and storage

use crate::client::ClientError;
use crate::state_machine::TransitionError;
use crate::validation::ValidationError;
use thiserror::Error;

/// Why a send did not produce a normal bot reply.
///
/// Every variant is shown to the user as a notice or error bubble; none
/// ends the session.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("a reply is still pending, wait for it before sending again")]
    Busy,
    #[error("transport failure: {0}")]
    Transport(#[from] ClientError),
    #[error("server reported an error: {message}")]
    Application { message: String },
    #[error("internal state error: {0}")]
    Internal(String),
}

impl ChatError {
    /// True when nothing was sent and nothing was recorded
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Busy)
    }
}

impl From<TransitionError> for ChatError {
    fn from(e: TransitionError) -> Self {
        match e {
            TransitionError::Rejected(v) => Self::Validation(v),
            TransitionError::Busy => Self::Busy,
            TransitionError::InvalidTransition(msg) => Self::Internal(msg),
        }
    }
}

/// Persisted-storage failures. Always logged and swallowed by the history
/// store; losing history is not critical.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored history is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage quota exceeded")]
    QuotaExceeded,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;
