mod reader;
mod types;
mod validator;

pub use reader::LogReader;
pub use types::LogEntry;
pub use validator::EntryValidator;

use std::path::Path;

/// Load a log file and keep only the entries usable for analysis
///
/// A file that cannot be read or parsed is logged and treated as an empty
/// batch, so callers see the same outcome as for a file with no valid entries.
pub fn load_entries(path: &Path) -> Vec<LogEntry> {
    match LogReader::from_file(path) {
        Ok(records) => EntryValidator::validate(&records),
        Err(e) => {
            tracing::error!("Error loading log file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}
