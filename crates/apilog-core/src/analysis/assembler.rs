use super::{
    AnalysisOptions, AnalysisResult, Analyzer, Clock, EndpointCount, ErrorRateCalculator,
    Frequencies, FrequencyAggregator, IpCount, Metadata, PerformanceAnalyzer, SCHEMA_VERSION,
    TimeRange, TrafficStats, percentage,
};
use crate::log::LogEntry;

/// Runs every analysis stage over a validated batch and builds the report
pub struct ResultAssembler<C> {
    options: AnalysisOptions,
    clock: C,
}

impl<C: Clock> ResultAssembler<C> {
    pub fn with_clock(options: AnalysisOptions, clock: C) -> Self {
        Self { options, clock }
    }

    fn traffic(&self, frequencies: &Frequencies, total: usize) -> TrafficStats {
        let most_active_ips = frequencies
            .ips
            .most_common(self.options.top_ips)
            .into_iter()
            .map(|(ip, count)| IpCount {
                ip,
                count,
                percentage: percentage(count, total),
            })
            .collect();

        let top_endpoints = frequencies
            .endpoints
            .most_common(self.options.top_endpoints)
            .into_iter()
            .map(|(endpoint, count)| EndpointCount {
                endpoint,
                count,
                percentage: percentage(count, total),
            })
            .collect();

        TrafficStats {
            most_active_ips,
            top_endpoints,
        }
    }
}

impl<C: Clock> Analyzer for ResultAssembler<C> {
    type Output = AnalysisResult;

    fn analyze(&self, entries: &[LogEntry]) -> Self::Output {
        tracing::debug!("Assembling analysis for {} entries", entries.len());

        if entries.is_empty() {
            tracing::warn!("No valid log entries to analyze");
        }

        let total = entries.len();
        let frequencies = FrequencyAggregator.analyze(entries);
        let traffic_analysis = self.traffic(&frequencies, total);
        let error_analysis =
            ErrorRateCalculator::from_options(&self.options).calculate(entries, &frequencies);
        let performance_analysis =
            PerformanceAnalyzer::new(self.options.slowest_requests).analyze(entries);

        let metadata = Metadata {
            schema_version: SCHEMA_VERSION,
            analysis_timestamp: self.clock.timestamp(),
            total_logs_analyzed: total,
            time_range: time_range(entries),
        };

        tracing::info!(
            "Analysis complete: {} entries, {} ips, {} endpoints",
            total,
            frequencies.ips.len(),
            frequencies.endpoints.len()
        );

        AnalysisResult {
            metadata,
            traffic_analysis,
            error_analysis,
            performance_analysis,
        }
    }
}

/// Lexicographic min and max of the non-empty entry timestamps
///
/// ISO-8601 strings in a single zone sort chronologically.
fn time_range(entries: &[LogEntry]) -> Option<TimeRange> {
    let mut timestamps = entries
        .iter()
        .filter_map(|e| e.timestamp.as_deref())
        .filter(|ts| !ts.is_empty());
    let first = timestamps.next()?;

    let (start, end) = timestamps.fold((first, first), |(start, end), ts| {
        (start.min(ts), end.max(ts))
    });

    Some(TimeRange {
        start: start.to_string(),
        end: end.to_string(),
    })
}
