use super::FrequencyTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP status code range class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// 200-299
    Success,
    /// 300-399
    Redirection,
    /// 400-499
    ClientError,
    /// 500-599
    ServerError,
}

impl StatusClass {
    /// Classify a status code; codes below 200 or from 600 up have no class
    pub fn of(status: i64) -> Option<Self> {
        match status {
            200..=299 => Some(StatusClass::Success),
            300..=399 => Some(StatusClass::Redirection),
            400..=499 => Some(StatusClass::ClientError),
            500..=599 => Some(StatusClass::ServerError),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::Success => "2xx",
            StatusClass::Redirection => "3xx",
            StatusClass::ClientError => "4xx",
            StatusClass::ServerError => "5xx",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry counts per status class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCategories {
    #[serde(rename = "2xx")]
    pub success: usize,
    #[serde(rename = "3xx")]
    pub redirection: usize,
    #[serde(rename = "4xx")]
    pub client_error: usize,
    #[serde(rename = "5xx")]
    pub server_error: usize,
}

impl StatusCategories {
    /// Bucket a status code histogram into classes
    pub fn from_distribution(distribution: &FrequencyTable<i64>) -> Self {
        let mut categories = Self::default();
        for (&status, count) in distribution.iter() {
            match StatusClass::of(status) {
                Some(class) => *categories.slot_mut(class) += count,
                None => tracing::debug!("Status {} is outside every class", status),
            }
        }
        categories
    }

    pub fn get(&self, class: StatusClass) -> usize {
        match class {
            StatusClass::Success => self.success,
            StatusClass::Redirection => self.redirection,
            StatusClass::ClientError => self.client_error,
            StatusClass::ServerError => self.server_error,
        }
    }

    fn slot_mut(&mut self, class: StatusClass) -> &mut usize {
        match class {
            StatusClass::Success => &mut self.success,
            StatusClass::Redirection => &mut self.redirection,
            StatusClass::ClientError => &mut self.client_error,
            StatusClass::ServerError => &mut self.server_error,
        }
    }

    /// Entries that fell into one of the four classes
    pub fn total(&self) -> usize {
        self.success + self.redirection + self.client_error + self.server_error
    }
}
