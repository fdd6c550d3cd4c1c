//! chat-widget - a small chat client
//!
//! Captures user text, posts it to a remote chat endpoint, renders the
//! conversation and keeps a bounded local history. Rendering, persistence
//! and HTTP are injected capabilities, so the same controller drives the
//! terminal client and the test fakes.

pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod runtime;
pub mod state_machine;
pub mod validation;

pub use chat::{ChatTurn, Role, Session};
pub use config::ChatConfig;
pub use error::{ChatError, StorageError};
pub use history::{HistoryStats, HistoryStore};
pub use runtime::{ConversationController, Renderer};
