use clap::ValueEnum;

pub mod commands;
pub mod config;

/// How `apilog` prints the analysis on stdout
///
/// Output files are written the same way for every format.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// The sectioned text report
    Pretty,
    /// The schema v3 document, same as the results file
    Json,
    /// Headline metrics and per-endpoint error rates as CSV rows
    Table,
}

impl OutputFormat {
    /// Name accepted by `--format`
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}
