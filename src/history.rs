//! Bounded, persisted chat history
//!
//! Turns are kept oldest-first. `recent` returns newest-first for "last N"
//! views. Every mutation is flushed to the persistence store; storage
//! failures are logged and never propagated, so the in-memory history stays
//! authoritative even when the disk is full or unavailable.

use crate::chat::{ChatTurn, Role};
use crate::error::StorageError;
use crate::runtime::PersistenceStore;
use std::collections::VecDeque;
use std::sync::Arc;

pub const DEFAULT_CAPACITY: usize = 50;
pub const DEFAULT_HISTORY_KEY: &str = "chatbotHistory";

/// Aggregate counts over the stored turns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryStats {
    pub total: usize,
    pub user_count: usize,
    pub bot_count: usize,
    /// Share of user turns as a percentage, one decimal
    pub ratio: f64,
}

pub struct HistoryStore {
    turns: VecDeque<ChatTurn>,
    capacity: usize,
    key: String,
    persistence: Arc<dyn PersistenceStore>,
}

impl HistoryStore {
    /// Build an empty store without touching persistence
    pub fn new(persistence: Arc<dyn PersistenceStore>, key: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
            key: key.into(),
            persistence,
        }
    }

    /// Build a store and restore whatever was persisted
    pub fn open(persistence: Arc<dyn PersistenceStore>, key: impl Into<String>, capacity: usize) -> Self {
        let mut store = Self::new(persistence, key, capacity);
        store.load();
        store
    }

    /// Best-effort restore. Corrupt or unreadable data leaves the store empty.
    pub fn load(&mut self) {
        match self.read_persisted() {
            Ok(turns) => {
                self.turns = turns.into();
                self.truncate_to_capacity();
                tracing::debug!(key = %self.key, count = self.turns.len(), "History loaded");
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to load history, starting empty");
                self.turns.clear();
            }
        }
    }

    fn read_persisted(&self) -> Result<Vec<ChatTurn>, StorageError> {
        match self.persistence.load(&self.key)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(Vec::new()),
        }
    }

    /// Best-effort write of the full sequence
    pub fn flush(&self) {
        let result = serde_json::to_string(&self.turns)
            .map_err(StorageError::from)
            .and_then(|blob| self.persistence.save(&self.key, &blob));
        if let Err(e) = result {
            tracing::warn!(key = %self.key, error = %e, "Failed to persist history");
        }
    }

    /// Record a turn as the newest entry, evicting the oldest past capacity
    pub fn append(&mut self, turn: ChatTurn) {
        tracing::debug!(turn_id = %turn.id, role = turn.role.as_str(), "Recording turn");
        self.turns.push_back(turn);
        self.truncate_to_capacity();
        self.flush();
    }

    pub fn clear(&mut self) {
        self.turns.clear();
        if let Err(e) = self.persistence.remove(&self.key) {
            tracing::warn!(key = %self.key, error = %e, "Failed to remove persisted history");
        }
        tracing::info!("History cleared");
    }

    fn truncate_to_capacity(&mut self) {
        while self.turns.len() > self.capacity {
            if let Some(evicted) = self.turns.pop_front() {
                tracing::trace!(turn_id = %evicted.id, "Evicted oldest turn");
            }
        }
    }

    pub fn stats(&self) -> HistoryStats {
        let total = self.turns.len();
        let user_count = self.turns.iter().filter(|t| t.role == Role::User).count();
        let bot_count = total - user_count;
        #[allow(clippy::cast_precision_loss)] // counts are bounded by capacity
        let ratio = if total == 0 {
            0.0
        } else {
            (user_count as f64 / total as f64 * 1000.0).round() / 10.0
        };
        HistoryStats {
            total,
            user_count,
            bot_count,
            ratio,
        }
    }

    /// Up to `n` turns, newest first
    pub fn recent(&self, n: usize) -> Vec<&ChatTurn> {
        self.turns.iter().rev().take(n).collect()
    }

    /// All turns, oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
