use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::format_detection::FileFormat;
use crate::record::Record;

use super::{create_output, Generator};

const ROOT_ELEMENT: &str = "records";
const RECORD_ELEMENT: &str = "record";

/// Writes `<records><record>...</record></records>` with one child per field.
#[derive(Debug, Default, Clone)]
pub struct XmlGenerator;

impl XmlGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Generator for XmlGenerator {
    fn generate(&self, records: &[Record], output_path: &Path) -> Result<()> {
        let output = create_output(output_path)?;
        let write_failed = |e: &dyn Display| ConvertError::conversion(output_path, e);

        let mut writer = Writer::new_with_indent(output, b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(|e| write_failed(&e))?;
        writer
            .write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))
            .map_err(|e| write_failed(&e))?;

        for record in records {
            writer
                .write_event(Event::Start(BytesStart::new(RECORD_ELEMENT)))
                .map_err(|e| write_failed(&e))?;

            for (key, value) in record.iter() {
                let name = sanitize_element_name(key);
                writer
                    .write_event(Event::Start(BytesStart::new(name.as_str())))
                    .map_err(|e| write_failed(&e))?;
                writer
                    .write_event(Event::Text(BytesText::new(value)))
                    .map_err(|e| write_failed(&e))?;
                writer
                    .write_event(Event::End(BytesEnd::new(name.as_str())))
                    .map_err(|e| write_failed(&e))?;
            }

            writer
                .write_event(Event::End(BytesEnd::new(RECORD_ELEMENT)))
                .map_err(|e| write_failed(&e))?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
            .map_err(|e| write_failed(&e))?;

        let output = writer.get_mut();
        output.write_all(b"\n").map_err(|e| write_failed(&e))?;
        output.flush().map_err(|e| write_failed(&e))?;

        Ok(())
    }

    fn format(&self) -> FileFormat {
        FileFormat::Xml
    }
}

/// Turns an arbitrary field key into a valid XML element name.
///
/// Empty keys become `field`. A leading digit gets a `_` prefix, any other
/// invalid leading character becomes `_`, and invalid characters after the
/// first are replaced with `_`. Only ASCII digits count as digits; other
/// numeric characters such as `²` are replaced.
pub fn sanitize_element_name(name: &str) -> String {
    let mut chars = name.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return "field".to_string(),
    };

    let mut sanitized = String::with_capacity(name.len() + 1);
    if first.is_alphabetic() || first == '_' {
        sanitized.push(first);
    } else {
        sanitized.push('_');
        if first.is_ascii_digit() {
            sanitized.push(first);
        }
    }

    for c in chars {
        if c.is_alphabetic() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.') {
            sanitized.push(c);
        } else {
            sanitized.push('_');
        }
    }

    sanitized
}
