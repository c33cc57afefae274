pub mod csv;
pub mod json;
pub mod xml;

use std::fs;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::format_detection::FileFormat;
use crate::record::Record;
use crate::validation::validate_input_file;

/// Common trait for all format readers
pub trait Parser {
    /// Read the whole input file into an ordered sequence of records
    fn parse(&self, input_path: &Path) -> Result<Vec<Record>>;

    /// The format this parser reads
    fn format(&self) -> FileFormat;
}

/// Loads the input as UTF-8 text after the shared existence checks.
///
/// A leading byte-order mark is dropped.
pub(crate) fn read_input(input_path: &Path) -> Result<String> {
    validate_input_file(input_path)?;
    let content = fs::read_to_string(input_path).map_err(|e| ConvertError::Unreadable {
        path: input_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match content.strip_prefix('\u{feff}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(content),
    }
}

/// 1-based line number of a byte offset within `text`.
pub(crate) fn line_at(text: &str, offset: usize) -> u64 {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() as u64 + 1
}
