use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::format_detection::FileFormat;

/// Every way a single conversion can fail.
///
/// The `Display` output is meant for end users and always names the file or
/// extension at fault.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Error: {message}")]
    UnsupportedFormat { message: String },

    #[error("Error: Input file '{}' not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("Error: Cannot read file '{}': {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("Error: Invalid {format} syntax in '{}'{}: {message}", .path.display(), line_suffix(.line))]
    Syntax {
        format: FileFormat,
        path: PathBuf,
        line: Option<u64>,
        message: String,
    },

    #[error("Error: Invalid structure in '{}': {message}", .path.display())]
    Structure { path: PathBuf, message: String },

    #[error("Error: Failed to write '{}': {message}", .path.display())]
    Conversion { path: PathBuf, message: String },

    #[error("Error: Cannot create directory '{}': {message}", .path.display())]
    Directory { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, ConvertError>;

fn line_suffix(line: &Option<u64>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

impl ConvertError {
    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }

    pub(crate) fn syntax(
        format: FileFormat,
        path: &Path,
        line: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            format,
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    pub(crate) fn structure(path: &Path, message: impl Into<String>) -> Self {
        Self::Structure {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn conversion(path: &Path, message: impl ToString) -> Self {
        Self::Conversion {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub(crate) fn directory(path: &Path, message: impl ToString) -> Self {
        Self::Directory {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// Line number reported by the format decoder, if any.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Syntax { line, .. } => *line,
            _ => None,
        }
    }
}
