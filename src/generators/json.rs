use std::io::Write;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::format_detection::FileFormat;
use crate::record::Record;

use super::{create_output, Generator};

/// Writes records as an indented JSON array of objects.
#[derive(Debug, Default, Clone)]
pub struct JsonGenerator;

impl JsonGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for JsonGenerator {
    fn generate(&self, records: &[Record], output_path: &Path) -> Result<()> {
        let mut writer = create_output(output_path)?;
        let write_failed = |e: std::io::Error| ConvertError::conversion(output_path, e);

        serde_json::to_writer_pretty(&mut writer, records)
            .map_err(|e| ConvertError::conversion(output_path, e))?;
        writeln!(writer).map_err(write_failed)?;
        writer.flush().map_err(write_failed)?;

        Ok(())
    }

    fn format(&self) -> FileFormat {
        FileFormat::Json
    }
}
