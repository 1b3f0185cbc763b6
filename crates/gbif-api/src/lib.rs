//! Rust client for the GBIF (Global Biodiversity Information Facility) API
//!
//! Resolves a scientific name to its GBIF backbone key, fetches the backbone
//! record behind it and collects every known synonym of it.
//!
//! # Example
//!
//! ```no_run
//! use gbif_api::GbifClient;
//!
//! # async fn example() -> Result<(), gbif_api::GbifError> {
//! let client = GbifClient::new()?;
//!
//! if let Some(species) = client.species_by_name("Lutra lutra").await? {
//!     for name in client.synonym_names(&species).await? {
//!         println!("{}", name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - `GET /species?name=` - Name usages for a name
//! - `GET /species/{key}` - Species details
//! - `GET /species/{key}/synonyms` - Synonyms of a taxon (paged)

mod client;
mod error;
mod types;

pub use client::GbifClient;
pub use error::{GbifError, Result};
pub use types::{GbifSpecies, NameUsage, PagingResponse, SpeciesDetail};
