use crate::OutputFormat;
use crate::config::Config;
use anyhow::{Context, Result};
use apilog_core::analysis::{AnalysisOptions, AnalysisResult, Analyzer, Clock, ResultAssembler};
use apilog_core::log::load_entries;
use apilog_core::report::{OutputPaths, ReportFormatter, ReportWriter};
use std::path::Path;

/// What a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The input held no usable entries, so nothing was written
    NothingToAnalyze,
    Completed(OutputPaths),
}

/// Analyze a log file and return the structured result
///
/// Returns `None` when the file yields no valid entries, including when it
/// cannot be loaded at all.
pub fn analyze_file<C: Clock>(
    file: &Path,
    options: AnalysisOptions,
    clock: C,
) -> Option<AnalysisResult> {
    tracing::debug!("Reading log file: {}", file.display());

    let entries = load_entries(file);
    if entries.is_empty() {
        return None;
    }

    Some(ResultAssembler::with_clock(options, clock).analyze(&entries))
}

pub fn execute<C: Clock>(config: &Config, format: OutputFormat, clock: C) -> Result<RunOutcome> {
    tracing::info!("Analyzing log file: {}", config.input.display());

    let Some(result) = analyze_file(&config.input, config.analysis, clock) else {
        println!("No valid logs to analyze");
        return Ok(RunOutcome::NothingToAnalyze);
    };

    let paths = ReportWriter::write_outputs(
        &result,
        &config.output_dir,
        &config.json_file,
        &config.report_file,
    )
    .with_context(|| {
        format!(
            "Failed to write analysis outputs to {}",
            config.output_dir.display()
        )
    })?;

    tracing::debug!("Printing results as {}", format.as_str());
    match format {
        OutputFormat::Json => output_json(&result)?,
        OutputFormat::Table => output_table(&result),
        OutputFormat::Pretty => output_pretty(&result, &paths),
    }

    Ok(RunOutcome::Completed(paths))
}

fn output_pretty(result: &AnalysisResult, paths: &OutputPaths) {
    use console::style;

    println!("{}", ReportFormatter::to_text(result));
    println!(
        "\n{} Full results saved to {}",
        style("Analysis complete.").bold().green(),
        style(paths.json.display()).cyan()
    );
    println!("  Text report saved to {}", paths.report.display());
}

fn output_json(result: &AnalysisResult) -> Result<()> {
    let json = ReportWriter::to_string(result)?;
    println!("{}", json);
    Ok(())
}

fn output_table(result: &AnalysisResult) {
    print!("{}", ReportFormatter::to_table(result));
}
