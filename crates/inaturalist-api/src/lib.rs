//! Rust client for the iNaturalist v1 taxa search API
//!
//! ```no_run
//! use inaturalist_api::{InatClient, TaxaQuery};
//!
//! # async fn example() -> Result<(), inaturalist_api::InatError> {
//! let client = InatClient::new()?;
//! let query = TaxaQuery::new("Lutra lutra").is_active(true).locale("ja");
//! for taxon in client.taxa(&query).await? {
//!     println!("{} {:?}", taxon.id, taxon.preferred_common_name);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod types;

pub use client::InatClient;
pub use error::{InatError, Result};
pub use types::{TaxaQuery, Taxon};
