use super::ReportFormatter;
use crate::Result;
use crate::analysis::AnalysisResult;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Where a run's outputs were written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub report: PathBuf,
}

pub struct ReportWriter;

impl ReportWriter {
    /// Write an analysis result to a file as pretty JSON
    pub fn to_file(result: &AnalysisResult, path: &Path) -> Result<()> {
        tracing::debug!("Writing analysis results to: {}", path.display());

        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, result)?;

        tracing::info!("Successfully wrote analysis results to {}", path.display());

        Ok(())
    }

    /// Convert an analysis result to a pretty JSON string
    pub fn to_string(result: &AnalysisResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }

    /// Write the JSON result and the text report into `dir`
    ///
    /// The directory is created if it does not exist yet.
    pub fn write_outputs(
        result: &AnalysisResult,
        dir: &Path,
        json_name: &str,
        report_name: &str,
    ) -> Result<OutputPaths> {
        fs::create_dir_all(dir)?;

        let paths = OutputPaths {
            json: dir.join(json_name),
            report: dir.join(report_name),
        };

        Self::to_file(result, &paths.json)?;

        tracing::debug!("Writing text report to: {}", paths.report.display());
        fs::write(&paths.report, ReportFormatter::to_text(result))?;

        Ok(paths)
    }
}
