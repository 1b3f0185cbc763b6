//! GBIF API HTTP client

use crate::error::{GbifError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Synonyms requested per page
const PAGE_SIZE: u64 = 100;

/// Client for the GBIF species API (v1)
pub struct GbifClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GbifClient {
    /// Base URL for GBIF API v1
    pub const V1_BASE_URL: &'static str = "https://api.gbif.org/v1/";

    /// Create a new GBIF client with default settings (30 second timeout)
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Create a new GBIF client with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::with_base_url(Self::V1_BASE_URL, timeout)
    }

    /// Create a client against a custom base URL (must end in `/`)
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    /// GET `url`, returning `None` on a non-success status
    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            debug!(status = response.status().as_u16(), "GBIF request failed");
            return Ok(None);
        }
        let body = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }

    /// Resolve a scientific name to its backbone species
    ///
    /// Uses the first name usage GBIF returns; `None` when there is none.
    pub async fn species_by_name(&self, name: &str) -> Result<Option<GbifSpecies>> {
        let mut url = self.base_url.join("species")?;
        url.query_pairs_mut().append_pair("name", name);

        let Some(page) = self.fetch::<PagingResponse<NameUsage>>(url).await? else {
            return Ok(None);
        };
        let Some(usage) = page.results.into_iter().next() else {
            return Ok(None);
        };

        Ok(usage
            .backbone_key()
            .map(|key| GbifSpecies::new(key, usage.canonical_name)))
    }

    /// Get detailed species information by GBIF key
    pub async fn get_species(&self, key: u64) -> Result<Option<SpeciesDetail>> {
        let url = self.base_url.join(&format!("species/{}", key))?;
        self.fetch(url).await
    }

    /// Every synonym usage of `key`, following pages until `endOfRecords`
    pub async fn synonyms(&self, key: u64) -> Result<Vec<NameUsage>> {
        let endpoint = self.base_url.join(&format!("species/{}/synonyms", key))?;
        let mut synonyms = Vec::new();
        let mut offset = 0;

        loop {
            let mut url = endpoint.clone();
            url.query_pairs_mut()
                .append_pair("offset", &offset.to_string())
                .append_pair("limit", &PAGE_SIZE.to_string());

            let response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(GbifError::Status(status.as_u16()));
            }
            let page: PagingResponse<NameUsage> = serde_json::from_slice(&response.bytes().await?)?;

            let fetched = page.results.len() as u64;
            synonyms.extend(page.results);
            debug!(key, offset, fetched, "Fetched GBIF synonym page");

            if page.end_of_records || fetched == 0 {
                break;
            }
            offset += fetched;
        }

        Ok(synonyms)
    }

    /// Accepted name followed by every synonym's canonical name
    ///
    /// With no synonyms this is just the species name, or empty when the
    /// name is unknown. An unnamed species with synonyms still lists them,
    /// headed by the accepted name the synonym rows carry.
    pub async fn synonym_names(&self, species: &GbifSpecies) -> Result<Vec<String>> {
        let synonyms = self.synonyms(species.key).await?;
        Ok(collect_names(species, &synonyms))
    }
}

fn collect_names(species: &GbifSpecies, synonyms: &[NameUsage]) -> Vec<String> {
    let Some(first) = synonyms.first() else {
        return species.name.iter().cloned().collect();
    };

    let accepted = first.species.clone().or_else(|| species.name.clone());
    accepted
        .into_iter()
        .chain(synonyms.iter().filter_map(|s| s.canonical_name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn client_for(router: Router) -> GbifClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        GbifClient::with_base_url(&format!("http://{}/v1/", addr), Duration::from_secs(5)).unwrap()
    }

    fn usage(canonical: &str) -> NameUsage {
        serde_json::from_value(json!({
            "key": 1,
            "canonicalName": canonical,
            "species": "Lutra lutra"
        }))
        .unwrap()
    }

    #[test]
    fn test_collect_names_accepted_first() {
        let species = GbifSpecies::new(5219243, Some("Lutra vulgaris".to_string()));
        let names = collect_names(&species, &[usage("Mustela lutra"), usage("Lutra nippon")]);
        assert_eq!(names, vec!["Lutra lutra", "Mustela lutra", "Lutra nippon"]);
    }

    #[test]
    fn test_collect_names_without_synonyms() {
        let named = GbifSpecies::new(1, Some("Lutra lutra".to_string()));
        assert_eq!(collect_names(&named, &[]), vec!["Lutra lutra"]);
        assert!(collect_names(&GbifSpecies::new(1, None), &[]).is_empty());
    }

    #[test]
    fn test_collect_names_unnamed_species_keeps_synonyms() {
        let unnamed = GbifSpecies::new(5219243, None);
        let names = collect_names(&unnamed, &[usage("Mustela lutra")]);
        assert_eq!(names, vec!["Lutra lutra", "Mustela lutra"]);
    }

    #[tokio::test]
    async fn test_species_by_name_prefers_nub_key() {
        let router = Router::new().route(
            "/v1/species",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("name").map(String::as_str), Some("Lutra lutra"));
                Json(json!({
                    "offset": 0,
                    "limit": 20,
                    "endOfRecords": false,
                    "results": [
                        {"key": 100022, "nubKey": 5219243, "canonicalName": "Lutra lutra"},
                        {"key": 5219243, "canonicalName": "Lutra lutra"}
                    ]
                }))
            }),
        );
        let client = client_for(router).await;

        let species = client.species_by_name("Lutra lutra").await.unwrap().unwrap();
        assert_eq!(species, GbifSpecies::new(5219243, Some("Lutra lutra".to_string())));
    }

    #[tokio::test]
    async fn test_species_by_name_no_results() {
        let router = Router::new().route(
            "/v1/species",
            get(|| async { Json(json!({"offset": 0, "limit": 20, "endOfRecords": true, "results": []})) }),
        );
        let client = client_for(router).await;
        assert!(client.species_by_name("Nothing here").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_synonyms_follow_pages() {
        // 150 synonyms: a full page of 100 then a final page of 50
        let router = Router::new().route(
            "/v1/species/{key}/synonyms",
            get(
                |Path(key): Path<u64>, Query(params): Query<HashMap<String, String>>| async move {
                    assert_eq!(key, 5219243);
                    let offset: u64 = params["offset"].parse().unwrap();
                    let limit: u64 = params["limit"].parse().unwrap();
                    let end = (offset + limit).min(150);
                    let results: Vec<_> = (offset..end)
                        .map(|i| json!({"key": i, "canonicalName": format!("Name {}", i), "species": "Lutra lutra"}))
                        .collect();
                    Json(json!({
                        "offset": offset,
                        "limit": limit,
                        "endOfRecords": end >= 150,
                        "results": results
                    }))
                },
            ),
        );
        let client = client_for(router).await;

        let synonyms = client.synonyms(5219243).await.unwrap();
        assert_eq!(synonyms.len(), 150);
        assert_eq!(synonyms[100].canonical_name.as_deref(), Some("Name 100"));
        assert_eq!(synonyms[149].key, Some(149));
    }

    #[tokio::test]
    async fn test_synonyms_status_error() {
        let router = Router::new().route(
            "/v1/species/{key}/synonyms",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE.into_response() }),
        );
        let client = client_for(router).await;
        assert!(matches!(client.synonyms(1).await, Err(GbifError::Status(503))));
    }

    #[tokio::test]
    async fn test_get_species_detail() {
        let router = Router::new().route(
            "/v1/species/{key}",
            get(|Path(key): Path<u64>| async move {
                Json(json!({
                    "key": key,
                    "scientificName": "Lutra lutra (Linnaeus, 1758)",
                    "canonicalName": "Lutra lutra",
                    "rank": "SPECIES",
                    "taxonomicStatus": "ACCEPTED",
                    "kingdom": "Animalia",
                    "family": "Mustelidae",
                    "numDescendants": 3
                }))
            }),
        );
        let client = client_for(router).await;

        let detail = client.get_species(5219243).await.unwrap().unwrap();
        assert_eq!(detail.key, Some(5219243));
        assert_eq!(detail.rank.as_deref(), Some("SPECIES"));
        assert_eq!(detail.taxonomic_status.as_deref(), Some("ACCEPTED"));
        assert_eq!(detail.lineage(), vec!["Animalia", "Mustelidae"]);
    }

    #[tokio::test]
    async fn test_get_species_missing() {
        let router = Router::new().route("/v1/species/{key}", get(|| async { StatusCode::NOT_FOUND }));
        let client = client_for(router).await;
        assert!(client.get_species(42).await.unwrap().is_none());
    }
}
