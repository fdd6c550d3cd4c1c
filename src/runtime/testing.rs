//! Fake implementations for testing
//!
//! These fakes enable controller and history tests without real I/O.

use super::traits::{ChatClient, PersistenceStore, Renderer};
use super::{Notice, RenderedTurn};
use crate::client::{ChatRequest, ChatResponse, ClientError, HealthResponse, StatsResponse};
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Recording Renderer
// ============================================================================

/// One call made against the rendering surface
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Turn(RenderedTurn),
    ShowTyping,
    HideTyping,
    Notice(Notice),
    DismissNotice(u64),
}

/// Renderer that records every call in order
#[derive(Default)]
pub struct RecordingRenderer {
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn turns(&self) -> Vec<RenderedTurn> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RenderCall::Turn(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RenderCall::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Notices shown and not yet dismissed
    pub fn visible_notices(&self) -> Vec<Notice> {
        let calls = self.calls();
        let dismissed: Vec<u64> = calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::DismissNotice(id) => Some(*id),
                _ => None,
            })
            .collect();
        self.notices()
            .into_iter()
            .filter(|n| !dismissed.contains(&n.id))
            .collect()
    }

    /// Whether the indicator is currently showing, judged by the last call
    pub fn typing_visible(&self) -> bool {
        self.calls()
            .iter()
            .rev()
            .find_map(|c| match c {
                RenderCall::ShowTyping => Some(true),
                RenderCall::HideTyping => Some(false),
                _ => None,
            })
            .unwrap_or(false)
    }

    fn push(&self, call: RenderCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Renderer for RecordingRenderer {
    fn render_turn(&self, turn: &RenderedTurn) {
        self.push(RenderCall::Turn(turn.clone()));
    }

    fn show_typing(&self) {
        self.push(RenderCall::ShowTyping);
    }

    fn hide_typing(&self) {
        self.push(RenderCall::HideTyping);
    }

    fn show_notice(&self, notice: &Notice) {
        self.push(RenderCall::Notice(notice.clone()));
    }

    fn dismiss_notice(&self, id: u64) {
        self.push(RenderCall::DismissNotice(id));
    }
}

// ============================================================================
// In-Memory Persistence
// ============================================================================

/// In-memory key/value storage with switchable failures
#[derive(Default)]
pub struct InMemoryPersistence {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Make every `load` fail
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every `save` fail as if the quota were exhausted
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl PersistenceStore for InMemoryPersistence {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("reads disabled".into()));
        }
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::QuotaExceeded);
        }
        self.insert(key, value);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

// ============================================================================
// Mock Chat Client
// ============================================================================

/// Mock chat client that returns queued replies
pub struct MockChatClient {
    responses: Mutex<VecDeque<Result<ChatResponse, ClientError>>>,
    health: Mutex<Result<HealthResponse, ClientError>>,
    stats: Mutex<Result<StatsResponse, ClientError>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            health: Mutex::new(Err(ClientError::network("no mock health configured"))),
            stats: Mutex::new(Err(ClientError::network("no mock stats configured"))),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a decoded server reply
    pub fn queue_response(&self, response: ChatResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    /// Queue a transport failure
    pub fn queue_error(&self, error: ClientError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn set_health(&self, health: Result<HealthResponse, ClientError>) {
        *self.health.lock().unwrap() = health;
    }

    pub fn set_stats(&self, stats: Result<StatsResponse, ClientError>) {
        *self.stats.lock().unwrap() = stats;
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<ChatResponse, ClientError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::network("No mock response queued")))
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_response()
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.health.lock().unwrap().clone()
    }

    async fn stats(&self) -> Result<StatsResponse, ClientError> {
        self.stats.lock().unwrap().clone()
    }
}

// ============================================================================
// Delayed Mock Chat Client (for timeout and cancellation testing)
// ============================================================================

/// Mock chat client that waits before answering
pub struct DelayedMockChatClient {
    inner: MockChatClient,
    delay: Duration,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedMockChatClient {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockChatClient::new(),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_response(&self, response: ChatResponse) {
        self.inner.queue_response(response);
    }
}

#[async_trait]
impl ChatClient for DelayedMockChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        self.inner.requests.lock().unwrap().push(request.clone());
        // notify_one stores a permit, so a waiter that arrives late still wakes
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.next_response()
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.inner.health().await
    }

    async fn stats(&self) -> Result<StatsResponse, ClientError> {
        self.inner.stats().await
    }
}
