//! Error types for the iNaturalist client

use std::fmt;

#[derive(Debug)]
pub enum InatError {
    /// HTTP request failed
    Http(reqwest::Error),
    /// Failed to parse JSON response
    Json(serde_json::Error),
    /// Request URL could not be built
    Url(url::ParseError),
    /// API answered with a non-success status
    Status(u16),
}

impl fmt::Display for InatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "iNaturalist HTTP error: {}", e),
            Self::Json(e) => write!(f, "iNaturalist JSON parse error: {}", e),
            Self::Url(e) => write!(f, "iNaturalist URL error: {}", e),
            Self::Status(code) => write!(f, "iNaturalist returned status {}", code),
        }
    }
}

impl std::error::Error for InatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Url(e) => Some(e),
            Self::Status(_) => None,
        }
    }
}

impl From<reqwest::Error> for InatError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for InatError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<url::ParseError> for InatError {
    fn from(e: url::ParseError) -> Self {
        Self::Url(e)
    }
}

/// Result type for iNaturalist API operations
pub type Result<T> = std::result::Result<T, InatError>;
