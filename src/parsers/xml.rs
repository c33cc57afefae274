use quick_xml::events::Event;
use quick_xml::Reader;
use std::mem;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};
use crate::format_detection::FileFormat;
use crate::record::Record;
use crate::validation::ensure_flat;

use super::{line_at, read_input, Parser};

/// Reads `<root><record><field>value</field></record></root>` documents.
///
/// DOCTYPE declarations are skipped and never expanded, so external entities
/// and DTD-defined entities are not resolved. References to undeclared
/// entities fail as syntax errors.
#[derive(Debug, Default, Clone)]
pub struct XmlParser;

impl XmlParser {
    pub fn new() -> Self {
        Self
    }
}

/// Position of the reader inside the three legal nesting levels.
///
/// The record and field under construction live inside the state that owns
/// them, so a field can only be committed into an open record.
#[derive(Debug)]
enum XmlState {
    Outside,
    InRoot,
    InRecord(Record),
    InField {
        record: Record,
        name: String,
        value: String,
    },
}

impl XmlState {
    fn depth(&self) -> usize {
        match self {
            XmlState::Outside => 0,
            XmlState::InRoot => 1,
            XmlState::InRecord(_) => 2,
            XmlState::InField { .. } => 3,
        }
    }
}

/// Depth-tracking accumulator fed by reader events.
///
/// Offsets passed in are byte positions in `content`, used to report the
/// line of a malformed construct.
struct RecordCollector<'a> {
    state: XmlState,
    records: Vec<Record>,
    root_opened: bool,
    root_closed: bool,
    content: &'a str,
    input_path: &'a Path,
}

impl<'a> RecordCollector<'a> {
    fn new(content: &'a str, input_path: &'a Path) -> Self {
        Self {
            state: XmlState::Outside,
            records: Vec::new(),
            root_opened: false,
            root_closed: false,
            content,
            input_path,
        }
    }

    fn malformed(&self, offset: usize, message: impl Into<String>) -> ConvertError {
        ConvertError::syntax(
            FileFormat::Xml,
            self.input_path,
            Some(line_at(self.content, offset)),
            message,
        )
    }

    fn start_element(&mut self, local_name: String, offset: usize) -> Result<()> {
        ensure_flat(self.state.depth() >= 3, FileFormat::Xml, self.input_path)?;
        if self.root_closed && self.state.depth() == 0 {
            return Err(self.malformed(offset, "content after the root element"));
        }

        self.state = match mem::replace(&mut self.state, XmlState::Outside) {
            XmlState::Outside => {
                self.root_opened = true;
                XmlState::InRoot
            }
            XmlState::InRoot => XmlState::InRecord(Record::new()),
            XmlState::InRecord(record) => XmlState::InField {
                record,
                name: local_name,
                value: String::new(),
            },
            field @ XmlState::InField { .. } => field,
        };
        Ok(())
    }

    /// Appends a text chunk to the open field, skipping whitespace-only chunks.
    fn text(&mut self, chunk: &str, offset: usize) -> Result<()> {
        if chunk.trim().is_empty() {
            return Ok(());
        }
        if matches!(self.state, XmlState::Outside) {
            return Err(self.malformed(offset, "text outside the root element"));
        }
        if let XmlState::InField { value, .. } = &mut self.state {
            value.push_str(chunk);
        }
        Ok(())
    }

    fn end_element(&mut self, offset: usize) -> Result<()> {
        self.state = match mem::replace(&mut self.state, XmlState::Outside) {
            XmlState::Outside => {
                return Err(self.malformed(offset, "closing tag without a matching opening tag"))
            }
            XmlState::InRoot => {
                self.root_closed = true;
                XmlState::Outside
            }
            XmlState::InRecord(record) => {
                self.records.push(record);
                XmlState::InRoot
            }
            XmlState::InField {
                mut record,
                name,
                value,
            } => {
                record.set_field(name, value.trim());
                XmlState::InRecord(record)
            }
        };
        Ok(())
    }

    fn finish(self) -> Result<Vec<Record>> {
        let end = self.content.len();
        if !matches!(self.state, XmlState::Outside) {
            return Err(self.malformed(end, "unexpected end of document"));
        }
        if !self.root_opened {
            return Err(self.malformed(end, "document has no root element"));
        }
        Ok(self.records)
    }
}

impl Parser for XmlParser {
    fn parse(&self, input_path: &Path) -> Result<Vec<Record>> {
        let content = read_input(input_path)?;

        let mut reader = Reader::from_str(&content);
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.check_end_names = true;

        let mut collector = RecordCollector::new(&content, input_path);
        loop {
            let event = reader.read_event().map_err(|e| {
                collector.malformed(reader.error_position() as usize, e.to_string())
            })?;
            let offset = reader.buffer_position() as usize;

            match event {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    collector.start_element(name, offset)?;
                }
                Event::End(_) => collector.end_element(offset)?,
                Event::Text(e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| collector.malformed(offset, err.to_string()))?;
                    collector.text(&text, offset)?;
                }
                Event::CData(e) => {
                    let bytes = e.into_inner();
                    collector.text(&String::from_utf8_lossy(&bytes), offset)?;
                }
                Event::DocType(_) => {
                    warn!("Ignoring DOCTYPE declaration in {:?}", input_path);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let records = collector.finish()?;

        debug!("Parsed {} XML records from {:?}", records.len(), input_path);
        Ok(records)
    }

    fn format(&self) -> FileFormat {
        FileFormat::Xml
    }
}
