//! Conversation controller
//!
//! Owns the session, the history store and the current state, and executes
//! the effects produced by the pure transition function.

use super::traits::{ChatClient, Renderer};
use super::{Notice, NoticeKind, RenderedTurn, DEFAULT_NOTICE_TTL};
use crate::chat::{new_turn_id, ChatTurn, Session};
use crate::client::{ChatRequest, ClientError};
use crate::error::ChatError;
use crate::history::{HistoryStats, HistoryStore};
use crate::state_machine::{transition, ChatContext, ChatState, Effect, Event, TransitionError};
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default bound on a single chat request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    /// Longest wait for a reply before it counts as a transport failure
    pub request_timeout: Duration,
    pub notice_ttl: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }
}

/// Cancels the request currently in flight, if any.
///
/// Cloneable so a signal handler can hold it while the controller is
/// borrowed by `send_message`.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    current: Arc<Mutex<Option<CancellationToken>>>,
}

impl CancelHandle {
    fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        *self.lock() = Some(token.clone());
        token
    }

    fn finish(&self) {
        self.lock().take();
    }

    /// Returns false when nothing was in flight
    pub fn cancel(&self) -> bool {
        match self.lock().take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct ConversationController {
    context: ChatContext,
    state: ChatState,
    history: HistoryStore,
    renderer: Arc<dyn Renderer>,
    client: Arc<dyn ChatClient>,
    options: ControllerOptions,
    typing_visible: bool,
    cancel: CancelHandle,
    next_notice_id: AtomicU64,
}

impl ConversationController {
    pub fn new(
        session: Session,
        history: HistoryStore,
        renderer: Arc<dyn Renderer>,
        client: Arc<dyn ChatClient>,
        options: ControllerOptions,
    ) -> Self {
        tracing::info!(
            session_id = %session.session_id,
            history_len = history.len(),
            "Chat controller initialized"
        );
        Self {
            context: ChatContext::new(session),
            state: ChatState::Idle,
            history,
            renderer,
            client,
            options,
            typing_visible: false,
            cancel: CancelHandle::default(),
            next_notice_id: AtomicU64::new(1),
        }
    }

    pub fn session(&self) -> &Session {
        &self.context.session
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn is_typing(&self) -> bool {
        self.typing_visible
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Render the newest `n` stored turns, oldest first
    pub fn replay(&self, n: usize) {
        for turn in self.history.recent(n).into_iter().rev() {
            self.renderer.render_turn(&RenderedTurn::from_turn(turn));
        }
    }

    /// Replay recent history and announce how much was restored
    pub fn restore(&self, replay: usize) {
        let total = self.history.len();
        tracing::info!(count = total, "History loaded");
        if total == 0 {
            return;
        }
        self.replay(replay);
        self.notify(
            NoticeKind::Success,
            format!("History restored ({total} previous messages)"),
        );
    }

    /// Run one full send cycle for `raw`.
    ///
    /// Returns the bot turn on a successful reply. Every error has already
    /// been shown to the user by the time it is returned.
    pub async fn send_message(&mut self, raw: &str) -> Result<ChatTurn, ChatError> {
        let event = Event::submit(new_turn_id(), raw, Utc::now());
        self.process_event(event).await
    }

    async fn process_event(&mut self, event: Event) -> Result<ChatTurn, ChatError> {
        let mut events = vec![event];
        let mut reply: Option<ChatTurn> = None;
        let mut failure: Option<ChatError> = None;

        while let Some(current) = events.pop() {
            match &current {
                Event::NetworkFailure { error } => {
                    failure = Some(ChatError::Transport(error.clone()));
                }
                Event::ResponseError { response, .. } => {
                    failure = Some(ChatError::Application {
                        message: response.clone(),
                    });
                }
                _ => {}
            }
            let event_name = current.name();

            // Pure state transition
            let result = match transition(&self.state, &self.context, current) {
                Ok(r) => r,
                Err(e) => {
                    self.report_rejection(&e);
                    return Err(e.into());
                }
            };

            tracing::debug!(
                session_id = %self.context.session_id(),
                event = event_name,
                from = self.state.name(),
                to = result.new_state.name(),
                "State transition"
            );
            if let (Some((pending_turn_id, sent_at)), None) =
                (self.state.pending(), result.new_state.pending())
            {
                tracing::info!(
                    session_id = %self.context.session_id(),
                    pending_turn_id,
                    outcome = event_name,
                    latency_ms = (Utc::now() - sent_at).num_milliseconds(),
                    "Request settled"
                );
            }
            self.state = result.new_state;

            for effect in result.effects {
                if let Effect::RecordTurn { turn } = &effect {
                    if !turn.is_user() {
                        reply = Some(turn.clone());
                    }
                }
                if let Some(generated) = self.execute_effect(effect).await {
                    events.push(generated);
                }
            }
        }

        match (failure, reply) {
            (Some(e), _) => Err(e),
            (None, Some(turn)) => Ok(turn),
            (None, None) => Err(ChatError::Internal("send cycle ended without a reply".into())),
        }
    }

    async fn execute_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::RenderTurn { turn } => {
                self.renderer.render_turn(&RenderedTurn::from_turn(&turn));
                None
            }
            Effect::RecordTurn { turn } => {
                self.history.append(turn);
                None
            }
            Effect::ShowTyping => {
                if !self.typing_visible {
                    self.typing_visible = true;
                    self.renderer.show_typing();
                }
                None
            }
            Effect::HideTyping => {
                self.typing_visible = false;
                self.renderer.hide_typing();
                None
            }
            Effect::ShowNotice { kind, text } => {
                self.notify(kind, text);
                None
            }
            Effect::SendRequest { request } => Some(self.dispatch(&request).await),
        }
    }

    /// Send a request bounded by the timeout and the cancel handle
    async fn dispatch(&self, request: &ChatRequest) -> Event {
        let token = self.cancel.begin();
        let timeout = self.options.request_timeout;

        let result = tokio::select! {
            r = tokio::time::timeout(timeout, self.client.send(request)) => {
                r.unwrap_or_else(|_| Err(ClientError::timeout(format!(
                    "no reply within {}ms",
                    timeout.as_millis()
                ))))
            }
            () = token.cancelled() => Err(ClientError::cancelled()),
        };
        self.cancel.finish();

        match result {
            Ok(response) => Event::from_response(response, new_turn_id(), Utc::now()),
            Err(error) => {
                tracing::warn!(
                    session_id = %self.context.session_id(),
                    kind = error.kind.as_str(),
                    error = %error,
                    "Error sending message"
                );
                Event::NetworkFailure { error }
            }
        }
    }

    fn report_rejection(&self, error: &TransitionError) {
        match error {
            TransitionError::Rejected(reason) => {
                self.notify(NoticeKind::Warning, reason.to_string());
            }
            TransitionError::Busy => self.notify(NoticeKind::Info, error.to_string()),
            TransitionError::InvalidTransition(msg) => {
                tracing::error!(state = self.state.name(), error = %msg, "Invalid transition");
            }
        }
    }

    /// Show a transient system notice and schedule its dismissal
    pub fn notify(&self, kind: NoticeKind, text: impl Into<String>) {
        let notice = Notice {
            id: self.next_notice_id.fetch_add(1, Ordering::Relaxed),
            kind,
            text: text.into(),
            ttl: self.options.notice_ttl,
        };
        match kind {
            NoticeKind::Error => tracing::error!(text = %notice.text, "System notice"),
            NoticeKind::Warning => tracing::warn!(text = %notice.text, "System notice"),
            NoticeKind::Info | NoticeKind::Success => {
                tracing::info!(text = %notice.text, "System notice");
            }
        }
        self.renderer.show_notice(&notice);
        self.schedule_dismissal(notice.id);
    }

    fn schedule_dismissal(&self, id: u64) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let renderer = Arc::clone(&self.renderer);
        let ttl = self.options.notice_ttl;
        handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            renderer.dismiss_notice(id);
        });
    }

    /// True only when the server answers `/health` with `healthy`
    pub async fn health_check(&self) -> bool {
        match tokio::time::timeout(self.options.request_timeout, self.client.health()).await {
            Ok(Ok(health)) => health.is_healthy(),
            Ok(Err(_)) | Err(_) => false,
        }
    }

    /// Health check that warns the user when the server looks down
    pub async fn check_server(&self) -> bool {
        let healthy = self.health_check().await;
        if !healthy {
            self.notify(NoticeKind::Warning, "The server appears to be unavailable");
        }
        healthy
    }

    /// Server-side statistics, `None` on any failure
    pub async fn server_stats(&self) -> Option<Value> {
        match tokio::time::timeout(self.options.request_timeout, self.client.stats()).await {
            Ok(Ok(stats)) => stats.into_statistics(),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Error fetching server statistics");
                None
            }
            Err(_) => None,
        }
    }

    pub fn history_stats(&self) -> HistoryStats {
        self.history.stats()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.notify(NoticeKind::Success, "History cleared");
    }

    /// Session teardown: cancel anything in flight and flush history
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        if self.typing_visible {
            self.typing_visible = false;
            self.renderer.hide_typing();
        }
        self.history.flush();
        tracing::info!(session_id = %self.context.session_id(), "Chat session closed");
    }
}
