use super::types::LogEntry;
use serde_json::{Map, Value};

/// Filters raw records down to entries usable for analysis
///
/// A record is kept when it is a JSON object with non-empty string `ip` and
/// `endpoint` fields. Everything else is dropped without error. Optional
/// fields with an unexpected JSON type are treated as absent.
pub struct EntryValidator;

impl EntryValidator {
    pub fn validate(records: &[Value]) -> Vec<LogEntry> {
        tracing::debug!("Validating {} raw records", records.len());

        let entries: Vec<LogEntry> = records
            .iter()
            .enumerate()
            .filter_map(|(idx, record)| {
                let entry = Self::validate_record(record);
                if entry.is_none() {
                    tracing::debug!("Dropping record {}: missing ip or endpoint", idx);
                }
                entry
            })
            .collect();

        tracing::debug!(
            "Kept {} of {} records after validation",
            entries.len(),
            records.len()
        );

        entries
    }

    /// Convert a single record, returning `None` if it is not usable
    pub fn validate_record(record: &Value) -> Option<LogEntry> {
        let fields = record.as_object()?;

        let ip = required_str(fields, "ip")?;
        let endpoint = required_str(fields, "endpoint")?;

        Some(LogEntry {
            ip: ip.to_string(),
            endpoint: endpoint.to_string(),
            status: status_code(fields),
            method: optional_str(fields, "method"),
            response_time_ms: fields.get("response_time_ms").and_then(Value::as_f64),
            timestamp: optional_str(fields, "timestamp"),
        })
    }
}

fn required_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Integer `status`, anything else is reported and treated as absent
fn status_code(fields: &Map<String, Value>) -> Option<i64> {
    let value = fields.get("status")?;
    let status = value.as_i64();
    if status.is_none() && !value.is_null() {
        tracing::debug!("Ignoring non-integer status {}", value);
    }
    status
}

fn optional_str(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}
