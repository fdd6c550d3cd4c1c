//! Chat endpoint error types

use thiserror::Error;

/// Transport-level failure talking to the chat server
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub kind: ClientErrorKind,
    pub message: String,
    /// HTTP status when the server answered with a non-2xx code
    pub status: Option<u16>,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Timeout, message)
    }

    pub fn cancelled() -> Self {
        Self::new(ClientErrorKind::Cancelled, "request cancelled")
    }

    pub fn http_status(status: u16) -> Self {
        Self {
            kind: ClientErrorKind::HttpStatus,
            message: format!("HTTP error! status: {status}"),
            status: Some(status),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Decode, message)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(e.to_string())
        } else if e.is_decode() {
            Self::decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::http_status(status.as_u16())
        } else {
            Self::network(e.to_string())
        }
    }
}

/// Error classification, used for logging and notices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// Connection refused, DNS, reset
    Network,
    /// No reply within the request timeout
    Timeout,
    /// Cancelled by the user
    Cancelled,
    /// Server answered with a non-2xx status
    HttpStatus,
    /// Body was not the expected JSON
    Decode,
}

impl ClientErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::HttpStatus => "http_status",
            Self::Decode => "decode",
        }
    }
}
