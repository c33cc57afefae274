use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::format_detection::FileFormat;
use crate::record::Record;

use super::{read_input, Parser};

pub struct CsvParser {
    /// Explicit delimiter; detected from the first line when unset
    pub delimiter: Option<u8>,
}

impl CsvParser {
    pub fn new() -> Self {
        Self { delimiter: None }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for CsvParser {
    fn parse(&self, input_path: &Path) -> Result<Vec<Record>> {
        let content = read_input(input_path)?;
        if content.is_empty() {
            return Ok(Vec::new());
        }

        let delimiter = self
            .delimiter
            .unwrap_or_else(|| detect_delimiter(&content));
        debug!("Using CSV delimiter '{}' for {:?}", delimiter as char, input_path);

        if let Some(line) = find_unclosed_quote(&content, delimiter) {
            return Err(ConvertError::syntax(
                FileFormat::Csv,
                input_path,
                Some(line),
                "unterminated quoted field",
            ));
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .double_quote(true)
            .flexible(true) // Short rows are padded below
            .has_headers(false)
            .from_reader(content.as_bytes());

        let mut rows = reader.records();

        let headers: Vec<String> = match rows.next() {
            Some(row) => row
                .map_err(|e| csv_syntax_error(e, input_path))?
                .iter()
                .map(|cell| cell.trim().to_string())
                .collect(),
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        for row in rows {
            let row = row.map_err(|e| csv_syntax_error(e, input_path))?;

            // Blank and all-empty rows are dropped, which absorbs trailing newlines
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let mut record = Record::new();
            for (i, header) in headers.iter().enumerate() {
                let value = row.get(i).map(str::trim).unwrap_or("");
                record.set_field(header.as_str(), value);
            }
            records.push(record);
        }

        debug!("Parsed {} CSV records from {:?}", records.len(), input_path);
        Ok(records)
    }

    fn format(&self) -> FileFormat {
        FileFormat::Csv
    }
}

/// Picks `;` when it strictly outnumbers `,` on the first line.
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");
    let commas = first_line.matches(',').count();
    let semicolons = first_line.matches(';').count();

    if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// Returns the line where a quoted field opens without ever closing.
fn find_unclosed_quote(content: &str, delimiter: u8) -> Option<u64> {
    let mut line = 1u64;
    let mut quote_line = 1u64;
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut bytes = content.bytes().peekable();

    while let Some(b) = bytes.next() {
        if in_quotes {
            if b == b'"' {
                if bytes.peek() == Some(&b'"') {
                    bytes.next();
                } else {
                    in_quotes = false;
                }
            } else if b == b'\n' {
                line += 1;
            }
            continue;
        }

        if b == b'"' && at_field_start {
            in_quotes = true;
            quote_line = line;
        }
        if b == b'\n' {
            line += 1;
        }
        at_field_start = b == delimiter || b == b'\n' || b == b'\r';
    }

    in_quotes.then_some(quote_line)
}

fn csv_syntax_error(err: csv::Error, input_path: &Path) -> ConvertError {
    let line = err.position().map(|pos| pos.line());
    ConvertError::syntax(FileFormat::Csv, input_path, line, err.to_string())
}
