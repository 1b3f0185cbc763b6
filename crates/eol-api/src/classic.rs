//! Classic EOL page search

use crate::error::{EolError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Optional filters for [`ClassicClient::search`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Match only pages whose title, synonym or common name equals the query
    pub exact: Option<bool>,
    /// Limit results to members of this page's taxonomic group
    pub filter_by_taxon_concept_id: Option<u64>,
    pub filter_by_hierarchy_entry_id: Option<u64>,
    /// Exact-match this term and filter by the group of the matching page
    pub filter_by_string: Option<String>,
    /// Seconds EOL may cache the response
    pub cache_ttl: Option<u64>,
}

impl SearchOptions {
    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = Some(exact);
        self
    }

    fn append_to(&self, url: &mut Url) {
        let mut pairs = url.query_pairs_mut();
        if let Some(exact) = self.exact {
            pairs.append_pair("exact", &exact.to_string());
        }
        if let Some(id) = self.filter_by_taxon_concept_id {
            pairs.append_pair("filter_by_taxon_concept_id", &id.to_string());
        }
        if let Some(id) = self.filter_by_hierarchy_entry_id {
            pairs.append_pair("filter_by_hierarchy_entry_id", &id.to_string());
        }
        if let Some(term) = &self.filter_by_string {
            pairs.append_pair("filter_by_string", term);
        }
        if let Some(ttl) = self.cache_ttl {
            pairs.append_pair("cache_ttl", &ttl.to_string());
        }
    }
}

/// One hit from the search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub title: Option<String>,
    pub link: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    start_index: u64,
    #[serde(default)]
    items_per_page: u64,
    #[serde(default)]
    results: Vec<SearchResult>,
}

pub struct ClassicClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ClassicClient {
    pub const BASE_URL: &'static str = "https://eol.org/";

    pub fn new() -> Result<Self> {
        Self::with_base_url(Self::BASE_URL, Duration::from_secs(30))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    /// Search pages, fetching result pages until `limit` hits are collected
    /// or the results run out
    pub async fn search(
        &self,
        q: &str,
        limit: usize,
        options: &SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        let mut endpoint = self.base_url.join("api/search/1.0.json")?;
        endpoint.query_pairs_mut().append_pair("q", q);
        options.append_to(&mut endpoint);

        let mut results = Vec::new();
        let mut page = 1u32;

        while results.len() < limit {
            let mut url = endpoint.clone();
            url.query_pairs_mut().append_pair("page", &page.to_string());

            let response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(EolError::Status(status.as_u16()));
            }
            let data: SearchResponse = serde_json::from_slice(&response.bytes().await?)?;
            debug!(q, page, total = data.total_results, "Fetched EOL search page");

            let exhausted = data.items_per_page == 0
                || data.start_index + data.items_per_page >= data.total_results;
            results.extend(data.results);
            if exhausted {
                break;
            }
            page += 1;
        }

        results.truncate(limit);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn client_for(router: Router) -> ClassicClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        ClassicClient::with_base_url(&format!("http://{}/", addr), Duration::from_secs(5)).unwrap()
    }

    /// 45 results served 20 per page
    fn paged_router() -> Router {
        Router::new().route(
            "/api/search/1.0.json",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("q").map(String::as_str), Some("Lutra"));
                assert_eq!(params.get("exact").map(String::as_str), Some("true"));
                let page: u64 = params["page"].parse().unwrap();
                let start = (page - 1) * 20 + 1;
                let end = (start + 20).min(46);
                let results: Vec<_> = (start..end)
                    .map(|id| json!({"id": id, "title": format!("Lutra {}", id)}))
                    .collect();
                Json(json!({
                    "totalResults": 45,
                    "startIndex": start,
                    "itemsPerPage": 20,
                    "results": results
                }))
            }),
        )
    }

    #[tokio::test]
    async fn test_search_stops_at_total() {
        let client = client_for(paged_router()).await;
        let results = client
            .search("Lutra", 100, &SearchOptions::default().exact(true))
            .await
            .unwrap();

        assert_eq!(results.len(), 45);
        assert_eq!(results[20].id, 21);
    }

    #[tokio::test]
    async fn test_search_truncates_to_limit() {
        let client = client_for(paged_router()).await;
        let results = client
            .search("Lutra", 30, &SearchOptions::default().exact(true))
            .await
            .unwrap();

        assert_eq!(results.len(), 30);
        assert_eq!(results.last().map(|r| r.id), Some(30));
    }

    #[test]
    fn test_unset_options_omitted() {
        let mut url = Url::parse("https://eol.org/api/search/1.0.json?q=x").unwrap();
        SearchOptions {
            cache_ttl: Some(60),
            ..SearchOptions::default()
        }
        .append_to(&mut url);
        assert_eq!(url.query(), Some("q=x&cache_ttl=60"));
    }
}
