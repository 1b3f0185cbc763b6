//! iNaturalist HTTP client

use crate::error::{InatError, Result};
use crate::types::{TaxaQuery, TaxaResponse, Taxon};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub struct InatClient {
    http: reqwest::Client,
    base_url: Url,
}

impl InatClient {
    pub const BASE_URL: &'static str = "https://api.inaturalist.org/v1/";

    /// Create a new client with default settings (30 second timeout)
    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::BASE_URL, Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::with_base_url(Self::BASE_URL, timeout)
    }

    /// Create a client against a custom base URL (must end in `/`)
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Search taxa
    ///
    /// See <https://api.inaturalist.org/v1/docs/#!/Taxa/get_taxa>
    pub async fn taxa(&self, query: &TaxaQuery) -> Result<Vec<Taxon>> {
        let mut url = self.base_url.join("taxa")?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.to_query_pairs() {
                pairs.append_pair(key, &value);
            }
        }

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(InatError::Status(status.as_u16()));
        }

        let data: TaxaResponse = serde_json::from_slice(&response.bytes().await?)?;
        debug!(
            q = query.q.as_deref().unwrap_or(""),
            total = data.total_results,
            returned = data.results.len(),
            "Fetched iNaturalist taxa"
        );
        Ok(data.results)
    }
}
