//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the controller with fake implementations.

use super::{Notice, RenderedTurn};
use crate::error::StorageResult;
use std::sync::Arc;

pub use crate::client::ChatClient;

/// Surface the conversation is drawn on
pub trait Renderer: Send + Sync {
    /// Append a message bubble
    fn render_turn(&self, turn: &RenderedTurn);

    /// Show the "bot is typing" indicator
    fn show_typing(&self);

    fn hide_typing(&self);

    /// Show a transient system notice
    fn show_notice(&self, notice: &Notice);

    /// Called once `notice.ttl` has elapsed. Surfaces that cannot take
    /// output back may ignore it.
    fn dismiss_notice(&self, id: u64);
}

/// Key/value blob storage for local history
pub trait PersistenceStore: Send + Sync {
    /// Read the blob stored under `key`, `None` if absent
    fn load(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace the blob stored under `key`
    fn save(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`; deleting a missing key succeeds
    fn remove(&self, key: &str) -> StorageResult<()>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

impl<T: Renderer + ?Sized> Renderer for Arc<T> {
    fn render_turn(&self, turn: &RenderedTurn) {
        (**self).render_turn(turn);
    }

    fn show_typing(&self) {
        (**self).show_typing();
    }

    fn hide_typing(&self) {
        (**self).hide_typing();
    }

    fn show_notice(&self, notice: &Notice) {
        (**self).show_notice(notice);
    }

    fn dismiss_notice(&self, id: u64) {
        (**self).dismiss_notice(id);
    }
}

impl<T: PersistenceStore + ?Sized> PersistenceStore for Arc<T> {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).save(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
