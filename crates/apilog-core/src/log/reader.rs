use crate::{Error, Result};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub struct LogReader;

impl LogReader {
    /// Read and parse a JSON array of log records from the given path
    pub fn from_file(path: &Path) -> Result<Vec<Value>> {
        tracing::debug!("Reading log file from: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let value: Value = serde_json::from_reader(reader)?;
        let records = Self::into_records(value)?;

        tracing::info!(
            "Successfully parsed log file with {} records",
            records.len()
        );

        Ok(records)
    }

    /// Parse a JSON array of log records from a string
    pub fn from_str(content: &str) -> Result<Vec<Value>> {
        tracing::debug!("Parsing log records from string");

        let value: Value = serde_json::from_str(content)?;
        let records = Self::into_records(value)?;

        tracing::info!(
            "Successfully parsed {} log records from string",
            records.len()
        );

        Ok(records)
    }

    fn into_records(value: Value) -> Result<Vec<Value>> {
        match value {
            Value::Array(records) => Ok(records),
            other => Err(Error::InvalidStructure(format!(
                "expected a top-level array of records, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
