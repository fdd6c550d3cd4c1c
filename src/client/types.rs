//! Wire types for the chat server

use serde::{Deserialize, Serialize};
use serde_json::Value;

const STATUS_SUCCESS: &str = "success";
const STATUS_HEALTHY: &str = "healthy";

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: String,
    /// ISO-8601 submission time
    pub timestamp: String,
}

/// Body returned by `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub status: String,
    #[serde(default)]
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl ChatResponse {
    pub fn success(response: impl Into<String>, confidence: f64, tag: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            response: response.into(),
            confidence: Some(confidence),
            tag: Some(tag.into()),
        }
    }

    pub fn failure(status: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            response: response.into(),
            confidence: None,
            tag: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

/// Body returned by `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == STATUS_HEALTHY
    }
}

/// Body returned by `GET /stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub status: String,
    #[serde(default)]
    pub statistics: Option<Value>,
}

impl StatsResponse {
    /// Statistics payload, only when the server reported success
    pub fn into_statistics(self) -> Option<Value> {
        if self.status == STATUS_SUCCESS {
            self.statistics
        } else {
            None
        }
    }
}
