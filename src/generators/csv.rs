use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::format_detection::FileFormat;
use crate::record::Record;

use super::{create_output, Generator};

pub struct CsvGenerator {
    pub delimiter: u8,
}

impl CsvGenerator {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for CsvGenerator {
    fn generate(&self, records: &[Record], output_path: &Path) -> Result<()> {
        let mut output = create_output(output_path)?;

        // No records means no header either: leave the file empty
        if records.is_empty() {
            output
                .flush()
                .map_err(|e| ConvertError::conversion(output_path, e))?;
            return Ok(());
        }

        let headers = header_union(records);
        debug!("Writing CSV with columns {:?}", headers);

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(output);

        let write_failed = |e: csv::Error| ConvertError::conversion(output_path, e);

        writer.write_record(&headers).map_err(write_failed)?;
        for record in records {
            let row = headers.iter().map(|h| record.get(h).unwrap_or(""));
            writer.write_record(row).map_err(write_failed)?;
        }

        writer
            .flush()
            .map_err(|e| ConvertError::conversion(output_path, e))?;
        Ok(())
    }

    fn format(&self) -> FileFormat {
        FileFormat::Csv
    }
}

/// All field names across the records, in first-seen order.
pub fn header_union(records: &[Record]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for key in records.iter().flat_map(|r| r.keys()) {
        if !headers.iter().any(|h| h == key) {
            headers.push(key.to_string());
        }
    }
    headers
}
