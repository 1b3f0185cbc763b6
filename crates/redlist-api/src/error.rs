//! Error types for the Red List client

use std::fmt;

/// Errors that can occur when talking to the Red List API
#[derive(Debug)]
pub enum RedListError {
    /// HTTP request failed
    Http(reqwest::Error),
    /// Response body was not the expected JSON
    Json(serde_json::Error),
    /// Endpoint could not be turned into a URL
    Url(url::ParseError),
    /// API answered with a non-success status
    Status(u16),
    /// No species matched the request
    NotFound(String),
    /// Taxon redirect did not lead to a species id
    Redirect(String),
    /// Country must be a two-letter ISO code
    InvalidCountry(String),
    /// Not one of the Red List categories
    InvalidCategory(String),
    /// A classification row could not be turned into an entry
    Code(redlist_codes::CodeError),
}

impl fmt::Display for RedListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "Red List HTTP error: {}", e),
            Self::Json(e) => write!(f, "Red List JSON parse error: {}", e),
            Self::Url(e) => write!(f, "Red List URL error: {}", e),
            Self::Status(code) => write!(f, "Red List returned status {}", code),
            Self::NotFound(msg) => write!(f, "{}", msg),
            Self::Redirect(msg) => write!(f, "Red List redirect error: {}", msg),
            Self::InvalidCountry(c) => write!(f, "'{}' is not a two-letter ISO country code", c),
            Self::InvalidCategory(c) => write!(f, "'{}' is not a Red List category", c),
            Self::Code(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RedListError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Url(e) => Some(e),
            Self::Code(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RedListError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for RedListError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<url::ParseError> for RedListError {
    fn from(e: url::ParseError) -> Self {
        Self::Url(e)
    }
}

impl From<redlist_codes::CodeError> for RedListError {
    fn from(e: redlist_codes::CodeError) -> Self {
        Self::Code(e)
    }
}

/// Result type for Red List API operations
pub type Result<T> = std::result::Result<T, RedListError>;
