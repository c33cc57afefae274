use std::fmt;
use std::path::Path;
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::generators::{csv::CsvGenerator, json::JsonGenerator, xml::XmlGenerator, Generator};
use crate::parsers::{csv::CsvParser, json::JsonParser, xml::XmlParser, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Xml,
    Csv,
}

impl FileFormat {
    /// Looks up a format by extension or name, ignoring case.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "json" => Ok(FileFormat::Json),
            "xml" => Ok(FileFormat::Xml),
            "csv" => Ok(FileFormat::Csv),
            _ => Err(ConvertError::unsupported(format!(
                "Unsupported file format '.{}'",
                extension
            ))),
        }
    }

    /// Detects the format from the file path's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_extension(&extension_of(path)?)
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Xml => "xml",
            FileFormat::Csv => "csv",
        }
    }

    pub fn parser(self) -> Box<dyn Parser> {
        match self {
            FileFormat::Json => Box::new(JsonParser::new()),
            FileFormat::Xml => Box::new(XmlParser::new()),
            FileFormat::Csv => Box::new(CsvParser::new()),
        }
    }

    pub fn generator(self) -> Box<dyn Generator> {
        match self {
            FileFormat::Json => Box::new(JsonGenerator::new()),
            FileFormat::Xml => Box::new(XmlGenerator::new()),
            FileFormat::Csv => Box::new(CsvGenerator::new()),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileFormat::Json => "JSON",
            FileFormat::Xml => "XML",
            FileFormat::Csv => "CSV",
        };
        f.write_str(name)
    }
}

/// Returns everything after the final `.` of the path.
///
/// Fails for an empty path, a path without a `.`, or a path ending in `.`.
pub fn extension_of(path: &Path) -> Result<String> {
    let raw = path.to_string_lossy();
    if raw.is_empty() {
        return Err(ConvertError::unsupported("File path cannot be empty"));
    }

    match raw.rfind('.') {
        Some(dot) if dot + 1 < raw.len() => Ok(raw[dot + 1..].to_string()),
        _ => Err(ConvertError::unsupported(format!(
            "File '{}' must have an extension",
            raw
        ))),
    }
}

/// Picks the reader for an input path based on its extension
pub fn resolve_reader(path: &Path) -> Result<Box<dyn Parser>> {
    let format = FileFormat::from_path(path)?;
    debug!("Resolved reader {} for {:?}", format, path);
    Ok(format.parser())
}

/// Picks the writer for an output path based on its extension
pub fn resolve_writer(path: &Path) -> Result<Box<dyn Generator>> {
    let format = FileFormat::from_path(path)?;
    debug!("Resolved writer {} for {:?}", format, path);
    Ok(format.generator())
}

pub fn resolve_reader_by_name(name: &str) -> Result<Box<dyn Parser>> {
    Ok(FileFormat::from_extension(name)?.parser())
}

pub fn resolve_writer_by_name(name: &str) -> Result<Box<dyn Generator>> {
    Ok(FileFormat::from_extension(name)?.generator())
}
