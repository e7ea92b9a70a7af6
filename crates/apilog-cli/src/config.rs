use apilog_core::analysis::AnalysisOptions;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log file analyzed when none is given on the command line
    pub input: PathBuf,
    /// Directory receiving the JSON results and the text report
    pub output_dir: PathBuf,
    pub json_file: String,
    pub report_file: String,
    pub analysis: AnalysisOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/sample_api_logs.json"),
            output_dir: PathBuf::from("output"),
            json_file: "analysis_results.json".to_string(),
            report_file: "analysis_report.txt".to_string(),
            analysis: AnalysisOptions::default(),
        }
    }
}

impl Config {
    pub fn load(explicit_file: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(explicit_file, None)
    }

    /// Same as [`Config::load`], reading `APILOG_*` variables from `env`
    /// instead of the process environment when given
    fn load_with_env(
        explicit_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let mut s = config::Config::builder();

        // an apilog.toml in the working dir is picked up when present
        s = s.add_source(config::File::with_name("apilog.toml").required(false));

        // if an explicit file was passed, then we load it as mandatory
        if let Some(explicit) = explicit_file.and_then(|x| x.to_str()) {
            s = s.add_source(config::File::with_name(explicit).required(true));
        }

        // env vars make the last-step overrides, e.g. APILOG_OUTPUT_DIR or
        // APILOG_ANALYSIS__TOP_IPS
        s = s.add_source(
            config::Environment::with_prefix("APILOG")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: Config = s.build()?.try_deserialize()?;
        tracing::debug!("Loaded configuration: {:?}", config);

        Ok(config)
    }
}
