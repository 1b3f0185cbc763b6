//! Error types for the spsearch CLI

use std::fmt;

#[derive(Debug)]
pub enum CliError {
    /// Missing or unreadable configuration
    Config(String),
    RedList(redlist_api::RedListError),
    Gbif(gbif_api::GbifError),
    Inat(inaturalist_api::InatError),
    Eol(eol_api::EolError),
    Code(redlist_codes::CodeError),
    Dictionary(redlist_codes::TranslationError),
    /// Output could not be rendered
    Json(serde_json::Error),
    /// Nothing matched the query
    NotFound(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::RedList(e) => write!(f, "{}", e),
            Self::Gbif(e) => write!(f, "{}", e),
            Self::Inat(e) => write!(f, "{}", e),
            Self::Eol(e) => write!(f, "{}", e),
            Self::Code(e) => write!(f, "{}", e),
            Self::Dictionary(e) => write!(f, "{}", e),
            Self::Json(e) => write!(f, "Cannot render output: {}", e),
            Self::NotFound(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RedList(e) => Some(e),
            Self::Gbif(e) => Some(e),
            Self::Inat(e) => Some(e),
            Self::Eol(e) => Some(e),
            Self::Code(e) => Some(e),
            Self::Dictionary(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Config(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<redlist_api::RedListError> for CliError {
    fn from(e: redlist_api::RedListError) -> Self {
        Self::RedList(e)
    }
}

impl From<gbif_api::GbifError> for CliError {
    fn from(e: gbif_api::GbifError) -> Self {
        Self::Gbif(e)
    }
}

impl From<inaturalist_api::InatError> for CliError {
    fn from(e: inaturalist_api::InatError) -> Self {
        Self::Inat(e)
    }
}

impl From<eol_api::EolError> for CliError {
    fn from(e: eol_api::EolError) -> Self {
        Self::Eol(e)
    }
}

impl From<redlist_codes::CodeError> for CliError {
    fn from(e: redlist_codes::CodeError) -> Self {
        Self::Code(e)
    }
}

impl From<redlist_codes::TranslationError> for CliError {
    fn from(e: redlist_codes::TranslationError) -> Self {
        Self::Dictionary(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<tracing_subscriber::filter::ParseError> for CliError {
    fn from(e: tracing_subscriber::filter::ParseError) -> Self {
        Self::Config(format!("Invalid log directive: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
