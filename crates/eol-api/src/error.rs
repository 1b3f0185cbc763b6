//! Error types for the EOL clients

use std::fmt;

/// Errors that can occur when talking to EOL
#[derive(Debug)]
pub enum EolError {
    /// HTTP request failed
    Http(reqwest::Error),
    /// Failed to parse JSON response
    Json(serde_json::Error),
    /// Request URL could not be built
    Url(url::ParseError),
    /// EOL answered with a non-success status
    Status(u16),
    /// Cypher result did not have the expected shape
    Unparsable(String),
    /// No page matched the request
    NotFound(String),
}

impl fmt::Display for EolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "EOL HTTP error: {}", e),
            Self::Json(e) => write!(f, "EOL JSON parse error: {}", e),
            Self::Url(e) => write!(f, "EOL URL error: {}", e),
            Self::Status(code) => write!(f, "EOL returned status {}", code),
            Self::Unparsable(msg) => write!(f, "Data cannot be parsed: {}", msg),
            Self::NotFound(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for EolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Url(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for EolError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for EolError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<url::ParseError> for EolError {
    fn from(e: url::ParseError) -> Self {
        Self::Url(e)
    }
}

/// Result type for EOL operations
pub type Result<T> = std::result::Result<T, EolError>;
