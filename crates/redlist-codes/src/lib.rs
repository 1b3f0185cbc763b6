//! IUCN Red List classification codes
//!
//! Habitats, threats and conservation measures are all classified with dotted
//! hierarchical codes (`"5.4.4"`). This crate parses those codes, keeps them in
//! numeric order, and offers prefix-scoped views over a species' entries.
//!
//! # Example
//!
//! ```
//! use redlist_codes::{CodeHierarchy, Domain};
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({"code": "5.4.4", "title": "Unintentional effects: (large scale)"}),
//!     json!({"code": "1.1", "title": "Housing & urban areas"}),
//!     json!({"code": "5.4", "title": "Fishing & harvesting aquatic resources"}),
//! ];
//! let threats = CodeHierarchy::from_records(Domain::Threat, &records).unwrap();
//!
//! assert_eq!(threats.top_level_branches().into_iter().collect::<Vec<_>>(), vec![1, 5]);
//! let fishing = threats.at_path("5.4").unwrap();
//! assert_eq!(fishing.len(), 2);
//! ```
//!
//! Translations are loaded once from delimited tables ([`Dictionaries`]) and
//! passed to whatever needs them.

mod code;
mod entry;
mod error;
mod hierarchy;
mod ja2sci;
mod translation;

pub use code::Code;
pub use entry::{CodeEntry, Details, Domain, HabitatDetails, ThreatDetails};
pub use error::{CodeError, Result, TranslationError};
pub use hierarchy::{CodeHierarchy, WithSyntheticParents};
pub use ja2sci::NameDictionary;
pub use translation::{Dictionaries, TableFormat, TranslationTable};
