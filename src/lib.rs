pub mod converter;
pub mod error;
pub mod format_detection;
pub mod generators;
pub mod logging;
pub mod parsers;
pub mod record;
pub mod validation;

// Re-export commonly used items for convenience
pub use converter::{ConversionSummary, Converter};
pub use error::{ConvertError, Result};
pub use format_detection::{
    extension_of, resolve_reader, resolve_reader_by_name, resolve_writer, resolve_writer_by_name,
    FileFormat,
};
pub use generators::{
    csv::CsvGenerator, json::JsonGenerator, xml::XmlGenerator, Generator,
};
pub use parsers::{csv::CsvParser, json::JsonParser, xml::XmlParser, Parser};
pub use record::Record;

use std::path::Path;

/// High-level function to convert between any two supported formats
/// The reader and writer are picked from the input and output extensions
pub fn convert_file(input_path: &Path, output_path: &Path) -> Result<ConversionSummary> {
    Converter::for_paths(input_path, output_path)?.convert(input_path, output_path)
}
