//! Rust clients for the Encyclopedia of Life (EOL)
//!
//! Two APIs are covered:
//!
//! - the classic page search (`/api/search/1.0.json`), see [`ClassicClient`]
//! - the trait bank Cypher service (`/service/cypher`), see [`CypherClient`]
//!   and the [`Page`] / [`Trait`] views built on top of it
//!
//! ```no_run
//! use eol_api::{CypherClient, Page};
//!
//! # async fn example() -> Result<(), eol_api::EolError> {
//! let cypher = CypherClient::new("my-token")?;
//! let page = Page::from_name(&cypher, "Lutra lutra").await?;
//! for category in page.categories(&cypher).await? {
//!     println!("{}", category);
//! }
//! # Ok(())
//! # }
//! ```

mod classic;
mod cypher;
mod error;
mod page;
mod traits;

pub use classic::{ClassicClient, SearchOptions, SearchResult};
pub use cypher::{cypher_string, CypherClient, CypherResult};
pub use error::{EolError, Result};
pub use page::Page;
pub use traits::{Resource, Term, Trait, TraitFilter, TraitProxy};
