//! Rust client for the IUCN Red List v3 API
//!
//! Provides species lookup by name, synonym, taxon id, category and country,
//! and fetches the habitat, threat and conservation-measure classifications
//! of a species as [`redlist_codes::CodeHierarchy`] values.

mod client;
mod error;
mod types;

pub use client::{CacheStats, RedListClient};
pub use error::{RedListError, Result};
pub use types::{CountryOccurrence, RedListCategory, Species, SpeciesInfo, Synonym};
