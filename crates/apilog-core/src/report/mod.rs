mod formatter;
mod writer;

pub use formatter::ReportFormatter;
pub use writer::{OutputPaths, ReportWriter};
