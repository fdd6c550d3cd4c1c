//! Chat server client abstraction
//!
//! The controller talks to the server only through [`ChatClient`], so tests
//! can swap in the mocks from `runtime::testing`.

mod error;
mod http;
mod types;

pub use error::{ClientError, ClientErrorKind};
pub use http::HttpChatClient;
pub use types::{ChatRequest, ChatResponse, HealthResponse, StatsResponse};

use async_trait::async_trait;
use std::sync::Arc;

/// Remote chat endpoint
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// `POST /chat`. Non-2xx statuses are errors.
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthResponse, ClientError>;

    /// `GET /stats`
    async fn stats(&self) -> Result<StatsResponse, ClientError>;
}

#[async_trait]
impl<T: ChatClient + ?Sized> ChatClient for Arc<T> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        (**self).send(request).await
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        (**self).health().await
    }

    async fn stats(&self) -> Result<StatsResponse, ClientError> {
        (**self).stats().await
    }
}

/// Logging wrapper for chat clients
pub struct LoggingChatClient {
    inner: Arc<dyn ChatClient>,
}

impl LoggingChatClient {
    pub fn new(inner: Arc<dyn ChatClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ChatClient for LoggingChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    session_id = %request.session_id,
                    duration_ms = %duration.as_millis(),
                    status = %response.status,
                    tag = response.tag.as_deref().unwrap_or(""),
                    "Chat request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    session_id = %request.session_id,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Chat request failed"
                );
            }
        }

        result
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        let result = self.inner.health().await;
        if let Err(e) = &result {
            tracing::debug!(error = %e, "Health check failed");
        }
        result
    }

    async fn stats(&self) -> Result<StatsResponse, ClientError> {
        let result = self.inner.stats().await;
        match &result {
            Ok(_) => tracing::debug!("Server statistics fetched"),
            Err(e) => tracing::warn!(error = %e, "Fetching server statistics failed"),
        }
        result
    }
}
