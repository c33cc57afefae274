use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::format_detection::FileFormat;

/// Shared flatness rule for hierarchical formats.
///
/// Fails with a structure error when `nested` is set; the message names the
/// format the user should flatten to.
pub fn ensure_flat(nested: bool, format: FileFormat, path: &Path) -> Result<()> {
    if nested {
        return Err(ConvertError::structure(
            path,
            format!(
                "Nested structures are not supported. Please use flat {}",
                format
            ),
        ));
    }
    Ok(())
}

/// Checks that the input exists and is a regular file.
///
/// Permission problems surface when the reader opens the file.
pub fn validate_input_file(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ConvertError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConvertError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(ConvertError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
    };

    if !metadata.is_file() {
        return Err(ConvertError::Unreadable {
            path: path.to_path_buf(),
            reason: "not a regular file".to_string(),
        });
    }

    Ok(())
}

/// Checks that the destination can be written once its directory exists.
pub fn validate_output_file(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(ConvertError::conversion(path, "output file path cannot be empty"));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Ok(metadata) = fs::metadata(parent) {
            if metadata.permissions().readonly() {
                return Err(ConvertError::directory(parent, "directory is not writable"));
            }
        }
    }

    if let Ok(metadata) = fs::metadata(path) {
        if metadata.is_dir() {
            return Err(ConvertError::conversion(path, "destination is a directory"));
        }
        if metadata.permissions().readonly() {
            return Err(ConvertError::conversion(path, "cannot overwrite read-only file"));
        }
    }

    Ok(())
}
