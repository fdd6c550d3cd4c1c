//! Input validation and sanitization for outgoing messages

use thiserror::Error;

/// Longest message accepted, in characters
pub const MAX_MESSAGE_CHARS: usize = 500;

/// Reason a message was rejected before any network call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("empty message")]
    Empty,
    #[error("message too long")]
    TooLong,
}

/// Outcome of [`validate`]: `message` is empty when valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: String,
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                is_valid: true,
                message: String::new(),
            },
            Err(e) => Self {
                is_valid: false,
                message: e.to_string(),
            },
        }
    }
}

/// Check a raw message. First failure wins.
pub fn check(raw: &str) -> Result<(), ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Empty);
    }
    if raw.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ValidationError::TooLong);
    }
    Ok(())
}

pub fn validate(raw: &str) -> ValidationResult {
    check(raw).into()
}

/// Trim, cap at [`MAX_MESSAGE_CHARS`], and drop angle brackets.
///
/// Not a substitute for escaping at render time.
pub fn sanitize(raw: &str) -> String {
    raw.trim()
        .chars()
        .take(MAX_MESSAGE_CHARS)
        .filter(|c| !matches!(c, '<' | '>'))
        .collect()
}
