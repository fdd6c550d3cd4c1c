//! reqwest-backed chat client

use super::types::{ChatRequest, ChatResponse, HealthResponse, StatsResponse};
use super::{ChatClient, ClientError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the chat server's JSON endpoints
pub struct HttpChatClient {
    client: Client,
    base_url: String,
}

impl HttpChatClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::http_status(status.as_u16()));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::decode(e.to_string()))
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let response = self
            .client
            .post(self.endpoint("chat"))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.client.get(self.endpoint("health")).send().await?;
        Self::decode(response).await
    }

    async fn stats(&self) -> Result<StatsResponse, ClientError> {
        let response = self.client.get(self.endpoint("stats")).send().await?;
        Self::decode(response).await
    }
}
