use crate::analysis::{AnalysisResult, StatusClass};
use chrono::DateTime;
use std::fmt;

const RULE_WIDTH: usize = 60;
const SERVER_ERRORS_SHOWN: usize = 5;

/// Renders an analysis result for people rather than programs
pub struct ReportFormatter;

impl ReportFormatter {
    /// Multi-section plain text report
    pub fn to_text(result: &AnalysisResult) -> String {
        TextReport(result).to_string()
    }

    /// Headline metrics as `Metric,Value` rows
    pub fn to_table(result: &AnalysisResult) -> String {
        TableReport(result).to_string()
    }
}

const STATUS_CLASSES: [StatusClass; 4] = [
    StatusClass::Success,
    StatusClass::Redirection,
    StatusClass::ClientError,
    StatusClass::ServerError,
];

struct TextReport<'a>(&'a AnalysisResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "API LOG ANALYSIS REPORT - {}",
            display_time(&result.metadata.analysis_timestamp)
        )?;
        writeln!(f, "{rule}")?;

        write_summary(f, result)?;
        write_status_codes(f, result)?;
        write_endpoints(f, result)?;
        write_ips(f, result)?;
        write_error_rates(f, result)?;
        write_slowest(f, result)?;
        write_server_errors(f, result)?;

        write!(f, "\n{rule}")
    }
}

struct TableReport<'a>(&'a AnalysisResult);

impl fmt::Display for TableReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let errors = &result.error_analysis;

        writeln!(f, "Metric,Value")?;
        writeln!(f, "Analysis Timestamp,{}", result.metadata.analysis_timestamp)?;
        writeln!(f, "Total Logs Analyzed,{}", result.metadata.total_logs_analyzed)?;
        if let Some(range) = &result.metadata.time_range {
            writeln!(f, "Time Range Start,{}", range.start)?;
            writeln!(f, "Time Range End,{}", range.end)?;
        }
        writeln!(
            f,
            "Average Response Time (ms),{:.2}",
            result.performance_analysis.avg_response_time_ms
        )?;
        writeln!(f, "Server Errors (5xx),{}", errors.server_error_count)?;
        writeln!(f, "Server Error Rate (%),{:.2}", errors.server_error_rate)?;
        for class in STATUS_CLASSES {
            writeln!(f, "Status {},{}", class, errors.status_categories.get(class))?;
        }

        writeln!(f)?;
        writeln!(f, "Endpoint,Requests,Server Errors,Error Rate (%)")?;
        for (endpoint, rate) in &errors.endpoint_error_rates {
            writeln!(
                f,
                "{},{},{},{:.2}",
                endpoint, rate.total_requests, rate.server_errors_5xx, rate.error_rate_percent
            )?;
        }

        Ok(())
    }
}

/// `YYYY-MM-DD HH:MM:SS` when the stamp parses, otherwise the raw stamp
fn display_time(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}

fn write_summary(f: &mut fmt::Formatter<'_>, result: &AnalysisResult) -> fmt::Result {
    let errors = &result.error_analysis;

    writeln!(f, "\nSUMMARY")?;
    writeln!(
        f,
        "  Total Logs Analyzed:   {}",
        result.metadata.total_logs_analyzed
    )?;
    if let Some(range) = &result.metadata.time_range {
        writeln!(f, "  Time Range:            {} to {}", range.start, range.end)?;
    }
    writeln!(
        f,
        "  Average Response Time: {:.2} ms",
        result.performance_analysis.avg_response_time_ms
    )?;
    writeln!(
        f,
        "  Server Errors (5xx):   {} ({:.2}%)",
        errors.server_error_count, errors.server_error_rate
    )
}

fn write_status_codes(f: &mut fmt::Formatter<'_>, result: &AnalysisResult) -> fmt::Result {
    let categories = &result.error_analysis.status_categories;

    writeln!(f, "\nSTATUS CODES")?;
    for class in STATUS_CLASSES {
        writeln!(f, "  {}: {}", class, categories.get(class))?;
    }
    Ok(())
}

fn write_endpoints(f: &mut fmt::Formatter<'_>, result: &AnalysisResult) -> fmt::Result {
    writeln!(f, "\nTOP ENDPOINTS")?;
    for (i, endpoint) in result.traffic_analysis.top_endpoints.iter().enumerate() {
        writeln!(
            f,
            "  {}. {} - {} requests ({:.2}%)",
            i + 1,
            endpoint.endpoint,
            endpoint.count,
            endpoint.percentage
        )?;
    }
    Ok(())
}

fn write_ips(f: &mut fmt::Formatter<'_>, result: &AnalysisResult) -> fmt::Result {
    writeln!(f, "\nMOST ACTIVE IPs")?;
    for (i, ip) in result.traffic_analysis.most_active_ips.iter().enumerate() {
        writeln!(
            f,
            "  {}. {} - {} requests ({:.2}%)",
            i + 1,
            ip.ip,
            ip.count,
            ip.percentage
        )?;
    }
    Ok(())
}

fn write_error_rates(f: &mut fmt::Formatter<'_>, result: &AnalysisResult) -> fmt::Result {
    let mut failing: Vec<_> = result
        .error_analysis
        .endpoint_error_rates
        .iter()
        .filter(|(_, rate)| rate.server_errors_5xx > 0)
        .collect();
    failing.sort_by(|(_, a), (_, b)| b.error_rate_percent.total_cmp(&a.error_rate_percent));

    writeln!(f, "\nENDPOINT ERROR RATES")?;
    if failing.is_empty() {
        writeln!(f, "  No endpoint errors detected")?;
    }
    for (endpoint, rate) in failing {
        writeln!(
            f,
            "  {}: {:.2}% ({}/{})",
            endpoint, rate.error_rate_percent, rate.server_errors_5xx, rate.total_requests
        )?;
    }
    Ok(())
}

fn write_slowest(f: &mut fmt::Formatter<'_>, result: &AnalysisResult) -> fmt::Result {
    let slowest = &result.performance_analysis.slowest_requests;
    if slowest.is_empty() {
        return Ok(());
    }

    writeln!(f, "\nSLOWEST REQUESTS")?;
    for (i, request) in slowest.iter().enumerate() {
        let status = request
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            f,
            "  {}. [{:.2} ms] {} {} - Status {} - IP: {}",
            i + 1,
            request.response_time_ms,
            request.method.as_deref().unwrap_or("-"),
            request.endpoint,
            status,
            request.ip
        )?;
    }
    Ok(())
}

fn write_server_errors(f: &mut fmt::Formatter<'_>, result: &AnalysisResult) -> fmt::Result {
    let errors = &result.error_analysis;

    writeln!(f, "\nSERVER ERRORS (5xx)")?;
    if errors.server_errors.is_empty() {
        return writeln!(f, "  No server errors detected");
    }

    for (i, error) in errors.server_errors.iter().take(SERVER_ERRORS_SHOWN).enumerate() {
        writeln!(
            f,
            "  {}. {} - Status {} - IP: {}",
            i + 1,
            error.endpoint,
            error.status,
            error.ip
        )?;
    }

    let shown = errors.server_errors.len().min(SERVER_ERRORS_SHOWN);
    if errors.server_error_count > shown {
        writeln!(
            f,
            "  ... and {} more errors",
            errors.server_error_count - shown
        )?;
    }
    Ok(())
}
