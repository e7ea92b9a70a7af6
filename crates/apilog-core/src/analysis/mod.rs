mod assembler;
mod clock;
mod errors;
mod frequency;
mod latency;
pub mod ranking;
mod status;

pub use assembler::ResultAssembler;
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::ErrorRateCalculator;
pub use frequency::{FrequencyAggregator, FrequencyTable, Frequencies};
pub use latency::{LatencyStats, PerformanceAnalyzer};
pub use status::{StatusCategories, StatusClass};

use crate::log::{EntryValidator, LogEntry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version of the serialized report layout
pub const SCHEMA_VERSION: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metadata: Metadata,
    pub traffic_analysis: TrafficStats,
    pub error_analysis: ErrorStats,
    pub performance_analysis: PerformanceStats,
}

impl AnalysisResult {
    /// True when the run had no validated entries to work with
    pub fn is_empty(&self) -> bool {
        self.metadata.total_logs_analyzed == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub schema_version: u32,
    pub analysis_timestamp: String,
    pub total_logs_analyzed: usize,
    pub time_range: Option<TimeRange>,
}

/// Earliest and latest `timestamp` seen among the analyzed entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficStats {
    pub most_active_ips: Vec<IpCount>,
    pub top_endpoints: Vec<EndpointCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpCount {
    pub ip: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointCount {
    pub endpoint: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorStats {
    pub status_code_distribution: FrequencyTable<i64>,
    pub status_categories: StatusCategories,
    pub server_error_count: usize,
    pub server_error_rate: f64,
    #[serde(with = "frequency::ordered_map")]
    pub endpoint_error_rates: Vec<(String, EndpointErrorRate)>,
    pub top_error_endpoints: Vec<ErrorEndpoint>,
    pub server_errors: Vec<ServerErrorSample>,
}

impl ErrorStats {
    /// Look up the error rate entry for one endpoint
    pub fn endpoint_error_rate(&self, endpoint: &str) -> Option<&EndpointErrorRate> {
        self.endpoint_error_rates
            .iter()
            .find(|(name, _)| name == endpoint)
            .map(|(_, rate)| rate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointErrorRate {
    pub total_requests: usize,
    pub server_errors_5xx: usize,
    pub error_rate_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEndpoint {
    pub endpoint: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorSample {
    pub timestamp: Option<String>,
    pub ip: String,
    pub endpoint: String,
    pub status: i64,
    pub method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub avg_response_time_ms: f64,
    pub slowest_requests: Vec<SlowRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlowRequest {
    pub endpoint: String,
    pub response_time_ms: f64,
    pub method: Option<String>,
    pub status: Option<i64>,
    pub ip: String,
}

/// Bounds for every ranked list in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub top_ips: usize,
    pub top_endpoints: usize,
    pub top_error_endpoints: usize,
    pub slowest_requests: usize,
    pub server_error_samples: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_ips: 10,
            top_endpoints: 5,
            top_error_endpoints: 5,
            slowest_requests: 5,
            server_error_samples: 10,
        }
    }
}

pub trait Analyzer {
    type Output;

    fn analyze(&self, entries: &[LogEntry]) -> Self::Output;
}

/// Validate raw records and analyze them with the default options
pub fn analyze_logs<C: Clock>(records: &[Value], clock: C) -> AnalysisResult {
    let entries = EntryValidator::validate(records);
    ResultAssembler::with_clock(AnalysisOptions::default(), clock).analyze(&entries)
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part` as a percentage of `whole`, two decimals, 0 for an empty whole
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}
