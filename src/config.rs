//! Client configuration from environment variables

use crate::history::{DEFAULT_CAPACITY, DEFAULT_HISTORY_KEY};
use crate::runtime::{ControllerOptions, DEFAULT_NOTICE_TTL, DEFAULT_REQUEST_TIMEOUT};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_HEALTH_CHECK_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Chat server root, e.g. `http://127.0.0.1:5000`
    pub base_url: String,
    /// Directory holding the persisted history file
    pub history_dir: PathBuf,
    pub history_key: String,
    pub history_capacity: usize,
    pub request_timeout: Duration,
    pub notice_ttl: Duration,
    /// Delay before the startup health check
    pub health_check_delay: Duration,
    /// Structured JSON log lines instead of human-readable text
    pub json_logs: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            history_dir: default_history_dir(std::env::var("HOME").ok()),
            history_key: DEFAULT_HISTORY_KEY.to_string(),
            history_capacity: DEFAULT_CAPACITY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            notice_ttl: DEFAULT_NOTICE_TTL,
            health_check_delay: Duration::from_millis(DEFAULT_HEALTH_CHECK_DELAY_MS),
            json_logs: false,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset or unparseable values fall
    /// back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self {
            history_dir: default_history_dir(lookup("HOME")),
            ..Self::default()
        };
        Self {
            base_url: lookup("CHAT_BASE_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.base_url),
            history_dir: lookup("CHAT_HISTORY_DIR")
                .filter(|v| !v.trim().is_empty())
                .map_or(defaults.history_dir, PathBuf::from),
            history_key: defaults.history_key,
            history_capacity: parse(&lookup, "CHAT_HISTORY_CAPACITY")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.history_capacity),
            request_timeout: parse(&lookup, "CHAT_REQUEST_TIMEOUT_SECS")
                .filter(|&n: &u64| n > 0)
                .map_or(defaults.request_timeout, Duration::from_secs),
            notice_ttl: parse(&lookup, "CHAT_NOTICE_TTL_SECS")
                .map_or(defaults.notice_ttl, Duration::from_secs),
            health_check_delay: parse(&lookup, "CHAT_HEALTH_CHECK_DELAY_MS")
                .map_or(defaults.health_check_delay, Duration::from_millis),
            json_logs: lookup("CHAT_LOG_FORMAT").is_some_and(|v| v.trim().eq_ignore_ascii_case("json")),
        }
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            request_timeout: self.request_timeout,
            notice_ttl: self.notice_ttl,
        }
    }
}

fn default_history_dir(home: Option<String>) -> PathBuf {
    let home = home.unwrap_or_else(|| "/tmp".to_string());
    PathBuf::from(home).join(".chat-widget")
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "Ignoring unparseable setting");
            None
        }
    }
}
