use super::ranking::top_n_by;
use super::{Analyzer, PerformanceStats, SlowRequest, round2};
use crate::log::LogEntry;

/// Running latency sum, mergeable across shards
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatencyStats {
    pub total_ms: f64,
    pub samples: usize,
}

impl LatencyStats {
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut stats = Self::default();
        for response_time in entries.iter().filter_map(|e| e.response_time_ms) {
            stats.record(response_time);
        }
        stats
    }

    pub fn record(&mut self, response_time_ms: f64) {
        self.total_ms += response_time_ms;
        self.samples += 1;
    }

    pub fn merge(&mut self, other: &LatencyStats) {
        self.total_ms += other.total_ms;
        self.samples += other.samples;
    }

    /// Mean response time rounded to two decimals, 0 without samples
    pub fn mean(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        round2(self.total_ms / self.samples as f64)
    }
}

pub struct PerformanceAnalyzer {
    top_n: usize,
}

impl PerformanceAnalyzer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }
}

impl Default for PerformanceAnalyzer {
    fn default() -> Self {
        Self::new(5)
    }
}

impl Analyzer for PerformanceAnalyzer {
    type Output = PerformanceStats;

    fn analyze(&self, entries: &[LogEntry]) -> Self::Output {
        tracing::debug!("Analyzing response time statistics");

        let latency = LatencyStats::from_entries(entries);

        let timed = entries.iter().filter_map(|e| {
            e.response_time_ms.map(|response_time_ms| SlowRequest {
                endpoint: e.endpoint.clone(),
                response_time_ms,
                method: e.method.clone(),
                status: e.status,
                ip: e.ip.clone(),
            })
        });
        let slowest_requests = top_n_by(timed, self.top_n, |r| &r.response_time_ms);

        tracing::info!(
            "Performance analysis complete: avg={:.2}ms over {} timed requests",
            latency.mean(),
            latency.samples
        );

        PerformanceStats {
            avg_response_time_ms: latency.mean(),
            slowest_requests,
        }
    }
}
