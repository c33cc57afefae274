use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::format_detection::{resolve_reader, resolve_writer, FileFormat};
use crate::generators::Generator;
use crate::parsers::Parser;
use crate::record::Record;
use crate::validation::validate_output_file;

/// Outcome of one successful conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    pub records: usize,
    pub input_format: FileFormat,
    pub output_format: FileFormat,
}

/// Wires one reader to one writer.
///
/// Each conversion should use its own `Converter`; instances hold no state
/// between calls.
pub struct Converter {
    parser: Box<dyn Parser>,
    generator: Box<dyn Generator>,
}

impl Converter {
    pub fn new(parser: Box<dyn Parser>, generator: Box<dyn Generator>) -> Self {
        Self { parser, generator }
    }

    /// Picks reader and writer from the two paths' extensions
    pub fn for_paths(input_path: &Path, output_path: &Path) -> Result<Self> {
        Ok(Self::new(
            resolve_reader(input_path)?,
            resolve_writer(output_path)?,
        ))
    }

    pub fn parser(&self) -> &dyn Parser {
        self.parser.as_ref()
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }

    pub fn parse(&self, input_path: &Path) -> Result<Vec<Record>> {
        self.parser.parse(input_path)
    }

    pub fn generate(&self, records: &[Record], output_path: &Path) -> Result<()> {
        self.generator.generate(records, output_path)
    }

    /// Checks the destination, reads every record, then writes them out.
    ///
    /// Input existence is checked by the reader itself.
    pub fn convert(&self, input_path: &Path, output_path: &Path) -> Result<ConversionSummary> {
        validate_output_file(output_path)?;

        let records = self.parse(input_path)?;
        debug!(
            "Read {} records from {:?} as {}",
            records.len(),
            input_path,
            self.parser.format()
        );

        self.generate(&records, output_path)?;
        info!(
            "Conversion complete! Wrote {} records to {:?}",
            records.len(),
            output_path
        );

        Ok(ConversionSummary {
            records: records.len(),
            input_format: self.parser.format(),
            output_format: self.generator.format(),
        })
    }
}
