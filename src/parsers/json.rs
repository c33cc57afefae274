use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::format_detection::FileFormat;
use crate::record::Record;
use crate::validation::ensure_flat;

use super::{read_input, Parser};

/// Reads a single JSON object or an array of flat objects.
#[derive(Debug, Default, Clone)]
pub struct JsonParser;

impl JsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for JsonParser {
    fn parse(&self, input_path: &Path) -> Result<Vec<Record>> {
        let content = read_input(input_path)?;

        let root: Value = serde_json::from_str(&content).map_err(|e| {
            let line = (e.line() > 0).then_some(e.line() as u64);
            ConvertError::syntax(FileFormat::Json, input_path, line, e.to_string())
        })?;

        let records = match root {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(object) => object_to_record(object, input_path),
                    _ => Err(ConvertError::structure(
                        input_path,
                        "Array elements must be objects",
                    )),
                })
                .collect::<Result<Vec<_>>>()?,
            Value::Object(object) => vec![object_to_record(object, input_path)?],
            _ => {
                return Err(ConvertError::structure(
                    input_path,
                    "JSON must be an object or array of objects",
                ))
            }
        };

        debug!("Parsed {} JSON records from {:?}", records.len(), input_path);
        Ok(records)
    }

    fn format(&self) -> FileFormat {
        FileFormat::Json
    }
}

fn object_to_record(object: Map<String, Value>, input_path: &Path) -> Result<Record> {
    let mut record = Record::new();
    for (key, value) in object {
        ensure_flat(
            matches!(value, Value::Object(_) | Value::Array(_)),
            FileFormat::Json,
            input_path,
        )?;

        let text = match value {
            Value::Null => String::new(),
            Value::String(s) => s,
            // Numbers keep their source digits
            Value::Number(n) => n.to_string(),
            other => other.to_string(),
        };
        record.set_field(key, text);
    }
    Ok(record)
}
