use apilog_cli::OutputFormat;
use apilog_cli::commands::analyze::{RunOutcome, analyze_file, execute};
use apilog_cli::config::Config;
use apilog_core::analysis::{AnalysisOptions, AnalysisResult, FixedClock};
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn clock() -> FixedClock {
    FixedClock::from_rfc3339("2025-03-02T08:00:00Z").unwrap()
}

fn analyze_sample() -> AnalysisResult {
    analyze_file(
        &fixture_path("sample_api_logs.json"),
        AnalysisOptions::default(),
        clock(),
    )
    .expect("sample fixture should contain valid entries")
}

fn config_for(input: PathBuf, output_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.input = input;
    config.output_dir = output_dir.path().join("output");
    config
}

/// Test that invalid records in the fixture are skipped
#[test]
fn test_analyze_file_counts_valid_entries() {
    let result = analyze_sample();

    assert_eq!(result.metadata.total_logs_analyzed, 11);
    assert_eq!(result.metadata.analysis_timestamp, "2025-03-02T08:00:00Z");

    let range = result.metadata.time_range.expect("fixture has timestamps");
    assert_eq!(range.start, "2025-03-01T10:00:00Z");
    assert_eq!(range.end, "2025-03-01T10:01:30Z");
}

/// Test that traffic rankings break ties by first occurrence
#[test]
fn test_analyze_file_traffic_rankings() {
    let result = analyze_sample();

    let ips: Vec<_> = result
        .traffic_analysis
        .most_active_ips
        .iter()
        .map(|ip| (ip.ip.as_str(), ip.count))
        .collect();
    assert_eq!(
        ips,
        vec![
            ("192.168.1.10", 4),
            ("192.168.1.11", 2),
            ("10.0.0.5", 2),
            ("192.168.1.12", 2),
            ("192.168.1.13", 1),
        ]
    );
    assert_eq!(result.traffic_analysis.most_active_ips[0].percentage, 36.36);

    let endpoints: Vec<_> = result
        .traffic_analysis
        .top_endpoints
        .iter()
        .map(|e| (e.endpoint.as_str(), e.count))
        .collect();
    assert_eq!(
        endpoints,
        vec![
            ("/api/users", 4),
            ("/api/orders", 3),
            ("/api/products", 3),
            ("/api/health", 1),
        ]
    );
}

/// Test status breakdown and error rates for the fixture
#[test]
fn test_analyze_file_error_analysis() {
    let errors = analyze_sample().error_analysis;

    assert_eq!(errors.server_error_count, 3);
    assert_eq!(errors.server_error_rate, 27.27);
    assert_eq!(errors.status_categories.success, 6);
    assert_eq!(errors.status_categories.redirection, 1);
    assert_eq!(errors.status_categories.client_error, 1);
    assert_eq!(errors.status_categories.server_error, 3);
    assert_eq!(errors.status_code_distribution.get(&200), 5);

    assert_eq!(errors.endpoint_error_rate("/api/users").unwrap().error_rate_percent, 25.0);
    assert_eq!(errors.endpoint_error_rate("/api/orders").unwrap().error_rate_percent, 33.33);
    assert_eq!(errors.endpoint_error_rate("/api/health").unwrap().error_rate_percent, 0.0);

    let ranked: Vec<_> = errors
        .top_error_endpoints
        .iter()
        .map(|e| e.endpoint.as_str())
        .collect();
    assert_eq!(ranked, vec!["/api/products", "/api/orders", "/api/users"]);
}

/// Test latency statistics for the fixture
#[test]
fn test_analyze_file_performance() {
    let performance = analyze_sample().performance_analysis;

    assert_eq!(performance.avg_response_time_ms, 506.5);

    let slowest: Vec<_> = performance
        .slowest_requests
        .iter()
        .map(|r| (r.endpoint.as_str(), r.response_time_ms))
        .collect();
    assert_eq!(
        slowest,
        vec![
            ("/api/orders", 2100.0),
            ("/api/products", 1250.0),
            ("/api/users", 870.0),
            ("/api/orders", 340.0),
            ("/api/products", 210.0),
        ]
    );
}

/// Test that files without usable entries produce no result
#[test]
fn test_analyze_file_without_valid_entries() {
    for fixture in ["empty.json", "invalid_only.json", "not_a_list.json", "missing.json"] {
        let result = analyze_file(&fixture_path(fixture), AnalysisOptions::default(), clock());
        assert!(result.is_none(), "{} should have nothing to analyze", fixture);
    }
}

/// Test that execute writes the JSON results and the text report
#[test]
fn test_execute_writes_outputs() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(fixture_path("sample_api_logs.json"), &temp_dir);

    let outcome = execute(&config, OutputFormat::Json, clock()).unwrap();

    let RunOutcome::Completed(paths) = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(paths.json, temp_dir.path().join("output").join("analysis_results.json"));

    let json = std::fs::read_to_string(&paths.json).unwrap();
    let written: AnalysisResult = serde_json::from_str(&json).unwrap();
    assert_eq!(written, analyze_sample());

    let report = std::fs::read_to_string(&paths.report).unwrap();
    assert!(report.contains("API LOG ANALYSIS REPORT - 2025-03-02 08:00:00"));
    assert!(report.contains("Total Logs Analyzed:   11"));
}

/// Test that empty input skips writing any output
#[test]
fn test_execute_with_nothing_to_analyze() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(fixture_path("invalid_only.json"), &temp_dir);

    let outcome = execute(&config, OutputFormat::Pretty, clock()).unwrap();

    assert_eq!(outcome, RunOutcome::NothingToAnalyze);
    assert!(!config.output_dir.exists());
}

/// Test that repeated runs with a fixed clock produce identical JSON
#[test]
fn test_execute_is_deterministic() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();

    let mut outputs = Vec::new();
    for dir in [&first_dir, &second_dir] {
        let config = config_for(fixture_path("sample_api_logs.json"), dir);
        let RunOutcome::Completed(paths) = execute(&config, OutputFormat::Table, clock()).unwrap()
        else {
            panic!("expected a completed run");
        };
        outputs.push(std::fs::read(&paths.json).unwrap());
    }

    assert_eq!(outputs[0], outputs[1]);
}
