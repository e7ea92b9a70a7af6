use serde::{Deserialize, Serialize};

/// A single observed API request
///
/// Only `ip` and `endpoint` are guaranteed; every other field is whatever the
/// source record carried, with no range checks applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub ip: String,
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl LogEntry {
    pub fn new(ip: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            endpoint: endpoint.into(),
            status: None,
            method: None,
            response_time_ms: None,
            timestamp: None,
        }
    }

    pub fn with_status(mut self, status: i64) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_response_time(mut self, response_time_ms: f64) -> Self {
        self.response_time_ms = Some(response_time_ms);
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// True for statuses in `[500, 600)`
    pub fn is_server_error(&self) -> bool {
        matches!(self.status, Some(status) if (500..600).contains(&status))
    }
}
