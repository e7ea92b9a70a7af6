use super::{
    AnalysisOptions, EndpointErrorRate, ErrorEndpoint, ErrorStats, Frequencies, FrequencyTable,
    ServerErrorSample, StatusCategories, percentage,
};
use crate::log::LogEntry;

/// Derives 5xx error statistics from the aggregated frequencies
pub struct ErrorRateCalculator {
    top_endpoints: usize,
    samples: usize,
}

impl ErrorRateCalculator {
    pub fn new(top_endpoints: usize, samples: usize) -> Self {
        Self {
            top_endpoints,
            samples,
        }
    }

    pub fn from_options(options: &AnalysisOptions) -> Self {
        Self::new(options.top_error_endpoints, options.server_error_samples)
    }

    pub fn calculate(&self, entries: &[LogEntry], frequencies: &Frequencies) -> ErrorStats {
        tracing::debug!("Calculating server error rates");

        let server_errors: Vec<&LogEntry> =
            entries.iter().filter(|e| e.is_server_error()).collect();
        let errors_by_endpoint: FrequencyTable<String> =
            server_errors.iter().map(|e| e.endpoint.clone()).collect();

        let endpoint_error_rates: Vec<(String, EndpointErrorRate)> = frequencies
            .endpoints
            .iter()
            .map(|(endpoint, calls)| {
                let errors = errors_by_endpoint.get(endpoint.as_str());
                let rate = EndpointErrorRate {
                    total_requests: calls,
                    server_errors_5xx: errors,
                    error_rate_percent: percentage(errors, calls),
                };
                (endpoint.clone(), rate)
            })
            .collect();

        let top_error_endpoints = errors_by_endpoint
            .most_common(self.top_endpoints)
            .into_iter()
            .map(|(endpoint, count)| ErrorEndpoint { endpoint, count })
            .collect();

        let samples = server_errors
            .iter()
            .take(self.samples)
            .filter_map(|e| {
                Some(ServerErrorSample {
                    timestamp: e.timestamp.clone(),
                    ip: e.ip.clone(),
                    endpoint: e.endpoint.clone(),
                    status: e.status?,
                    method: e.method.clone(),
                })
            })
            .collect();

        let server_error_count = server_errors.len();
        let server_error_rate = percentage(server_error_count, entries.len());

        tracing::info!(
            "Error analysis complete: {} server errors ({}%)",
            server_error_count,
            server_error_rate
        );

        ErrorStats {
            status_code_distribution: frequencies.statuses.clone(),
            status_categories: StatusCategories::from_distribution(&frequencies.statuses),
            server_error_count,
            server_error_rate,
            endpoint_error_rates,
            top_error_endpoints,
            server_errors: samples,
        }
    }
}

impl Default for ErrorRateCalculator {
    fn default() -> Self {
        Self::from_options(&AnalysisOptions::default())
    }
}
