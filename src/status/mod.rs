//! Live server status: data model and the rules that fold a poll outcome
//! into the displayed view.
//!
//! The aggregator answers with a loose JSON object. Every field is optional
//! and the `error` field is only ever tested for truthiness, never parsed.

pub mod http;
pub mod poller;

use serde::Deserialize;
use serde_json::Value;
use std::time::SystemTime;
use thiserror::Error;

/// Placeholder shown for the online count until the first poll completes
pub const LOADING_PLACEHOLDER: &str = "…";

/// Failure to obtain a decodable status body
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("status request timed out")]
    Timeout,

    #[error("status request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("status body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("status body is not a JSON object")]
    NotAnObject,
}

impl From<reqwest::Error> for StatusError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            StatusError::Timeout
        } else {
            StatusError::Request(e)
        }
    }
}

/// Tri-state connectivity flag driving the status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityState {
    #[default]
    Checking,
    Online,
    Offline,
}

impl ConnectivityState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectivityState::Checking => "checking",
            ConnectivityState::Online => "online",
            ConnectivityState::Offline => "offline",
        }
    }
}

/// Most recently applied set of status fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatusSnapshot {
    pub online: u32,
    pub max: u32,
    pub version: String,
    pub latency_ms: u32,
}

impl ServerStatusSnapshot {
    pub fn defaults(fallback_version: &str) -> Self {
        Self {
            online: 0,
            max: 0,
            version: fallback_version.to_string(),
            latency_ms: 0,
        }
    }
}

/// Raw aggregator body. Fields are kept as JSON values so that a
/// wrongly-typed field falls back to its default instead of failing
/// the whole decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub online: Option<Value>,
    #[serde(default)]
    pub max: Option<Value>,
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub latency: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl StatusResponse {
    /// True when the aggregator flagged the target server as unreachable
    pub fn reports_error(&self) -> bool {
        self.error.as_ref().map(is_truthy).unwrap_or(false)
    }

    /// Build a snapshot, substituting defaults for missing or falsy fields
    pub fn to_snapshot(&self, fallback_version: &str) -> ServerStatusSnapshot {
        let version = match &self.version {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => fallback_version.to_string(),
        };

        ServerStatusSnapshot {
            online: self.online.as_ref().and_then(as_count).unwrap_or(0),
            max: self.max.as_ref().and_then(as_count).unwrap_or(0),
            version,
            latency_ms: self.latency.as_ref().and_then(as_count).unwrap_or(0),
        }
    }
}

/// Decode an aggregator body. Anything other than a JSON object is rejected.
pub fn decode_body(bytes: &[u8]) -> Result<StatusResponse, StatusError> {
    let value: Value = serde_json::from_slice(bytes)?;
    if !value.is_object() {
        return Err(StatusError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}

/// JavaScript-style truthiness: null, false, 0, NaN and "" are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Non-negative count from a number or numeric string, rounded to nearest
fn as_count(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() || n <= 0.0 {
        return Some(0);
    }
    Some(n.round().min(u32::MAX as f64) as u32)
}

/// Everything a reader needs to render the badge and counters.
/// Published as one value so state and snapshot always match.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusView {
    pub state: ConnectivityState,
    pub snapshot: ServerStatusSnapshot,
    /// True until the first poll completes
    pub loading: bool,
    pub last_updated: Option<SystemTime>,
    pub last_error: Option<String>,
}

impl StatusView {
    pub fn new(fallback_version: &str) -> Self {
        Self {
            state: ConnectivityState::Checking,
            snapshot: ServerStatusSnapshot::defaults(fallback_version),
            loading: true,
            last_updated: None,
            last_error: None,
        }
    }

    /// Fold one poll outcome into the view
    pub fn apply(&mut self, outcome: Result<StatusResponse, StatusError>, fallback_version: &str) {
        match outcome {
            Ok(response) => {
                self.state = if response.reports_error() {
                    ConnectivityState::Offline
                } else {
                    ConnectivityState::Online
                };
                self.snapshot = response.to_snapshot(fallback_version);
                self.last_updated = Some(SystemTime::now());
                self.last_error = None;
            }
            Err(e) => {
                // Previous snapshot stays in place on transport failure
                self.state = ConnectivityState::Offline;
                self.last_error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Online count as displayed, or the placeholder before first resolution
    pub fn online_display(&self) -> String {
        if self.loading {
            LOADING_PLACEHOLDER.to_string()
        } else {
            self.snapshot.online.to_string()
        }
    }

    pub fn is_online(&self) -> bool {
        self.state == ConnectivityState::Online
    }
}
