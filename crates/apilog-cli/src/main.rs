use anyhow::Result;
use apilog_cli::OutputFormat;
use apilog_cli::commands;
use apilog_cli::config::Config;
use apilog_core::analysis::SystemClock;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apilog")]
#[command(author, version)]
#[command(
    about = "Analyze a batch of API request logs",
    long_about = "apilog reads a JSON array of API request records and reports traffic by client \
                  and endpoint, status code and server error breakdowns, and response times."
)]
struct Cli {
    /// Path to the JSON log file [default: configured input]
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Directory for the JSON results and text report
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE", env = "APILOG_CONFIG")]
    config: Option<PathBuf>,

    /// Console output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(file) = cli.file {
        config.input = file;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    commands::analyze::execute(&config, cli.format, SystemClock)?;

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("apilog=debug,apilog_core=debug,apilog_cli=debug")
        } else {
            EnvFilter::new("warn,apilog=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
