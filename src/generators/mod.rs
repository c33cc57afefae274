pub mod csv;
pub mod json;
pub mod xml;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

use crate::error::{ConvertError, Result};
use crate::format_detection::FileFormat;
use crate::record::Record;

/// Common trait for all format writers
pub trait Generator {
    /// Write the records to the output file, replacing any previous content
    fn generate(&self, records: &[Record], output_path: &Path) -> Result<()>;

    /// The format this generator writes
    fn format(&self) -> FileFormat;
}

/// Creates the parent directory if needed and opens the output for writing.
///
/// The directory is left in place if the later write fails.
pub(crate) fn create_output(output_path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            debug!("Creating output directory {:?}", parent);
            fs::create_dir_all(parent).map_err(|e| ConvertError::directory(parent, e))?;
        }
    }

    let file = File::create(output_path).map_err(|e| ConvertError::conversion(output_path, e))?;
    Ok(BufWriter::new(file))
}
