//! Error types for classification codes and dictionaries

use std::fmt;
use std::path::PathBuf;

/// Errors raised while building or navigating classification codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// A raw record lacks a required field
    MissingField(String),
    /// No entry lives under the requested codepoint
    NoMatch(String),
    /// A code is not a dot-separated list of non-negative integers
    InvalidCode(String),
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Record is missing required field '{}'", field),
            Self::NoMatch(codepoint) => write!(f, "Codepoint {} does not match any entry", codepoint),
            Self::InvalidCode(code) => write!(f, "Invalid classification code '{}'", code),
        }
    }
}

impl std::error::Error for CodeError {}

/// Result type for code operations
pub type Result<T> = std::result::Result<T, CodeError>;

/// Errors raised while loading translation tables
#[derive(Debug)]
pub enum TranslationError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Failed to read dictionary {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for TranslationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}
