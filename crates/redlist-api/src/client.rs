//! Red List v3 HTTP client

use crate::error::{RedListError, Result};
use crate::types::*;
use moka::future::Cache;
use redlist_codes::{CodeHierarchy, Domain};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const DEFAULT_BASE_URL: &str = "https://apiv3.iucnredlist.org/api/v3/";
/// Host a taxon redirect lands on when the id is known
const SPECIES_PAGE_HOST: &str = "www.iucnredlist.org";
/// Endpoints that are served without a token
const PUBLIC_ENDPOINTS: [&str; 4] = ["version", "weblink/", "website/", "taxonredirect/"];
const CACHE_TTL_MINS: u64 = 30;

/// Client for the IUCN Red List v3 API
///
/// Species summaries are cached in memory; classification lookups
/// (habitats, threats, measures) always hit the API.
pub struct RedListClient {
    http: reqwest::Client,
    /// Same pool settings but never follows redirects
    no_redirect: reqwest::Client,
    base_url: Url,
    token: String,
    info_cache: Cache<u64, SpeciesInfo>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Species info cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
}

impl RedListClient {
    /// Create a client against the public API with a 30 second timeout
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_BASE_URL, Duration::from_secs(30))
    }

    pub fn with_timeout(token: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a custom base URL (must end in `/`)
    pub fn with_base_url(token: impl Into<String>, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let no_redirect = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let info_cache = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(CACHE_TTL_MINS * 60))
            .build();

        Ok(Self {
            http,
            no_redirect,
            base_url: Url::parse(base_url)?,
            token: token.into(),
            info_cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        })
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            entries: self.info_cache.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let mut url = self.base_url.join(endpoint)?;
        if !PUBLIC_ENDPOINTS.iter().any(|p| endpoint.starts_with(p)) {
            url.query_pairs_mut().append_pair("token", &self.token);
        }
        Ok(url)
    }

    /// GET an endpoint relative to the base URL and decode the body
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.endpoint_url(endpoint)?;
        debug!(endpoint, "Red List request");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RedListError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// API version string, e.g. `"2022-2"`
    pub async fn version(&self) -> Result<String> {
        let data: VersionResponse = self.get("version").await?;
        Ok(data.version)
    }

    /// Look up a species by its accepted scientific name
    ///
    /// The species summary comes back from the same endpoint, so the result
    /// already has its info.
    pub async fn species_by_name(&self, name: &str) -> Result<Species> {
        let endpoint = format!("species/{}", urlencoding::encode(name));
        let data: ResultResponse<SpeciesInfo> = self.get(&endpoint).await?;
        let info = data.result.into_iter().next().ok_or_else(|| not_found(name))?;

        self.info_cache.insert(info.taxonid, info.clone()).await;
        Ok(Species::from_info(info))
    }

    /// Look up a species by scientific name or any of its synonyms, with info
    pub async fn species_by_synonym(&self, name: &str) -> Result<Species> {
        let endpoint = format!("species/synonym/{}", urlencoding::encode(name));
        let data: ResultResponse<Synonym> = self.get(&endpoint).await?;
        if data.count == Some(0) || data.result.is_empty() {
            return Err(not_found(name));
        }

        let first = &data.result[0];
        let mut species = Species::new(first.accepted_id, Some(first.accepted_name.clone()));
        species.synonyms = data.result;
        self.load_info(&mut species).await?;
        Ok(species)
    }

    /// Resolve a (possibly outdated) taxon id from the first redirect only
    ///
    /// Faster than [`RedListClient::species_by_id_ensured`] but an id that
    /// has been remapped more than once may not resolve to its final value.
    pub async fn species_by_id(&self, id: u64) -> Result<Species> {
        let url = self.endpoint_url(&format!("taxonredirect/{}", id))?;
        let response = self.no_redirect.head(url).send().await?;

        if !response.status().is_redirection() {
            return Err(RedListError::NotFound(format!("Species for id {} not found", id)));
        }

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| RedListError::Redirect("missing Location header".to_string()))?;
        let current = last_segment_id(location)?;

        debug!(requested = id, current, "Resolved taxon redirect");
        Ok(Species::new(current, None))
    }

    /// Resolve a taxon id by following every redirect to the species page
    pub async fn species_by_id_ensured(&self, id: u64) -> Result<Species> {
        let url = self.endpoint_url(&format!("taxonredirect/{}", id))?;
        let response = self.http.head(url).send().await?;

        let final_url = response.url();
        if final_url.host_str() != Some(SPECIES_PAGE_HOST) {
            return Err(RedListError::NotFound(format!("Species for id {} not found", id)));
        }
        let current = last_segment_id(final_url.path())?;

        debug!(requested = id, current, "Followed taxon redirects");
        Ok(Species::new(current, None))
    }

    /// Species assessed under `category`
    pub async fn species_by_category(&self, category: RedListCategory) -> Result<Vec<Species>> {
        let endpoint = format!("species/category/{}", category.path_segment());
        let data: ResultResponse<SpeciesListing> = self.get(&endpoint).await?;
        info!(%category, count = data.result.len(), "Fetched species by category");
        Ok(data.result.into_iter().map(Species::from).collect())
    }

    /// Species occurring in a country given by its two-letter ISO code
    pub async fn species_by_country(&self, country: &str) -> Result<Vec<Species>> {
        let code = country.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RedListError::InvalidCountry(country.to_string()));
        }

        let endpoint = format!("country/getspecies/{}", code.to_ascii_uppercase());
        let data: ResultResponse<SpeciesListing> = self.get(&endpoint).await?;
        info!(country = code, count = data.result.len(), "Fetched species by country");
        Ok(data.result.into_iter().map(Species::from).collect())
    }

    /// Assessment summary for a taxon id (cached)
    pub async fn species_info(&self, id: u64) -> Result<SpeciesInfo> {
        if let Some(info) = self.info_cache.get(&id).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(info);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let data: ResultResponse<SpeciesInfo> = self.get(&format!("species/id/{}", id)).await?;
        let info = data
            .result
            .into_iter()
            .next()
            .ok_or_else(|| RedListError::NotFound(format!("Species for id {} not found", id)))?;

        self.info_cache.insert(id, info.clone()).await;
        Ok(info)
    }

    /// Fill in `species.info` unless it is already present
    pub async fn load_info<'a>(&self, species: &'a mut Species) -> Result<&'a SpeciesInfo> {
        if species.info.is_none() {
            let info = self.species_info(species.taxonid).await?;
            species.set_info(info);
        }
        species
            .info
            .as_ref()
            .ok_or_else(|| RedListError::NotFound(format!("Species for id {} not found", species.taxonid)))
    }

    pub async fn habitats(&self, id: u64) -> Result<CodeHierarchy> {
        self.classification(Domain::Habitat, &format!("habitats/species/id/{}", id))
            .await
    }

    pub async fn threats(&self, id: u64) -> Result<CodeHierarchy> {
        self.classification(Domain::Threat, &format!("threats/species/id/{}", id))
            .await
    }

    pub async fn conservation_measures(&self, id: u64) -> Result<CodeHierarchy> {
        self.classification(Domain::ConservationMeasure, &format!("measures/species/id/{}", id))
            .await
    }

    /// Fetch the classification for `domain` by the species' id
    pub async fn classification_for(&self, domain: Domain, id: u64) -> Result<CodeHierarchy> {
        match domain {
            Domain::Habitat => self.habitats(id).await,
            Domain::Threat => self.threats(id).await,
            Domain::ConservationMeasure => self.conservation_measures(id).await,
        }
    }

    async fn classification(&self, domain: Domain, endpoint: &str) -> Result<CodeHierarchy> {
        let data: ResultResponse<serde_json::Value> = self.get(endpoint).await?;
        let hierarchy = CodeHierarchy::from_records(domain, &data.result)?;
        debug!(domain = domain.label(), entries = hierarchy.len(), "Fetched classification");
        Ok(hierarchy)
    }

    /// Countries in which the species exists or existed
    pub async fn country_occurrences(&self, id: u64) -> Result<Vec<CountryOccurrence>> {
        let data: ResultResponse<CountryOccurrence> =
            self.get(&format!("species/countries/id/{}", id)).await?;
        Ok(data.result)
    }
}

fn not_found(name: &str) -> RedListError {
    RedListError::NotFound(format!(
        "{} not found. Is it a scientific name (Latin name)?",
        name
    ))
}

/// Taxon id from the last non-empty path segment of a redirect target
fn last_segment_id(location: &str) -> Result<u64> {
    location
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| RedListError::Redirect(format!("no taxon id in '{}'", location)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::{header, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    const TOKEN: &str = "test-token";

    /// Serve `router` on an ephemeral port and return the API base URL
    async fn spawn_mock(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api/v3/", addr)
    }

    async fn client_for(router: Router) -> RedListClient {
        let base = spawn_mock(router).await;
        RedListClient::with_base_url(TOKEN, &base, Duration::from_secs(5)).unwrap()
    }

    fn require_token(params: &HashMap<String, String>) -> Option<StatusCode> {
        match params.get("token").map(String::as_str) {
            Some(TOKEN) => None,
            _ => Some(StatusCode::UNAUTHORIZED),
        }
    }

    #[test]
    fn test_last_segment_id() {
        assert_eq!(last_segment_id("https://www.iucnredlist.org/species/12419/").unwrap(), 12419);
        assert_eq!(last_segment_id("/species/12419").unwrap(), 12419);
        assert!(last_segment_id("https://www.iucnredlist.org/search").is_err());
    }

    #[tokio::test]
    async fn test_version_is_public() {
        let router = Router::new().route(
            "/api/v3/version",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert!(!params.contains_key("token"));
                Json(json!({"version": "2022-2"}))
            }),
        );
        let client = client_for(router).await;
        assert_eq!(client.version().await.unwrap(), "2022-2");
    }

    #[tokio::test]
    async fn test_threats_are_sorted_hierarchy() {
        let router = Router::new().route(
            "/api/v3/threats/species/id/{id}",
            get(
                |Path(id): Path<u64>, Query(params): Query<HashMap<String, String>>| async move {
                    if let Some(status) = require_token(&params) {
                        return status.into_response();
                    }
                    Json(json!({
                        "id": id.to_string(),
                        "result": [
                            {"code": "9.5.1", "title": "Acid rain", "timing": "Ongoing"},
                            {"code": "1.1", "title": "Housing & urban areas", "timing": "Ongoing"},
                            {"code": "9.5", "title": "Air-borne pollutants", "timing": "Ongoing"}
                        ]
                    }))
                    .into_response()
                },
            ),
        );
        let client = client_for(router).await;

        let threats = client.threats(12419).await.unwrap();
        let codes: Vec<&str> = threats.iter().map(|e| e.code().as_str()).collect();
        assert_eq!(codes, vec!["1.1", "9.5", "9.5.1"]);
        assert_eq!(threats.by_subcode(9).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bad_token_is_status_error() {
        let router = Router::new().route(
            "/api/v3/habitats/species/id/{id}",
            get(|| async { StatusCode::UNAUTHORIZED }),
        );
        let client = client_for(router).await;
        assert!(matches!(
            client.habitats(1).await,
            Err(RedListError::Status(401))
        ));
    }

    #[tokio::test]
    async fn test_species_by_name_not_found() {
        let router = Router::new().route(
            "/api/v3/species/{name}",
            get(|Path(name): Path<String>| async move {
                Json(json!({"name": name, "result": []}))
            }),
        );
        let client = client_for(router).await;
        assert!(matches!(
            client.species_by_name("Nonexistent beast").await,
            Err(RedListError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_species_by_synonym_loads_info_once() {
        let router = Router::new()
            .route(
                "/api/v3/species/synonym/{name}",
                get(|Path(name): Path<String>| async move {
                    assert_eq!(name, "Mustela lutra");
                    Json(json!({
                        "name": name,
                        "count": 1,
                        "result": [{
                            "accepted_id": 12419,
                            "accepted_name": "Lutra lutra",
                            "authority": "(Linnaeus, 1758)",
                            "synonym": "Mustela lutra",
                            "syn_authority": "Linnaeus, 1758"
                        }]
                    }))
                }),
            )
            .route(
                "/api/v3/species/id/{id}",
                get(|Path(id): Path<u64>| async move {
                    Json(json!({
                        "name": id.to_string(),
                        "result": [{
                            "taxonid": id,
                            "scientific_name": "Lutra lutra",
                            "category": "NT"
                        }]
                    }))
                }),
            );
        let client = client_for(router).await;

        let species = client.species_by_synonym("Mustela lutra").await.unwrap();
        assert_eq!(species.taxonid, 12419);
        assert_eq!(species.synonyms.len(), 1);
        assert_eq!(species.to_string(), "[NT]Lutra lutra");

        client.species_info(12419).await.unwrap();
        let stats = client.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[tokio::test]
    async fn test_species_by_category_path() {
        let router = Router::new().route(
            "/api/v3/species/category/{category}",
            get(|Path(category): Path<String>| async move {
                assert_eq!(category, "LRlc");
                Json(json!({
                    "count": 2,
                    "category": "LRlc",
                    "result": [
                        {"taxonid": 1, "scientific_name": "Aus bus", "subspecies": null},
                        {"taxonid": "2", "scientific_name": "Cus dus", "subspecies": null}
                    ]
                }))
            }),
        );
        let client = client_for(router).await;

        let species = client.species_by_category(RedListCategory::LrLc).await.unwrap();
        let ids: Vec<u64> = species.iter().map(|s| s.taxonid).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_species_by_country_rejects_names() {
        let client = RedListClient::new(TOKEN).unwrap();
        assert!(matches!(
            client.species_by_country("Japan").await,
            Err(RedListError::InvalidCountry(_))
        ));
    }

    #[tokio::test]
    async fn test_species_by_id_reads_location() {
        let router = Router::new().route(
            "/api/v3/taxonredirect/{id}",
            get(|Path(id): Path<u64>| async move {
                let target = if id == 41678 {
                    "https://www.iucnredlist.org/species/12419/".to_string()
                } else {
                    format!("https://www.iucnredlist.org/species/{}/", id)
                };
                (StatusCode::FOUND, [(header::LOCATION, target)])
            }),
        );
        let client = client_for(router).await;

        let species = client.species_by_id(41678).await.unwrap();
        assert_eq!(species.taxonid, 12419);
        assert!(!species.has_info());
    }

    #[tokio::test]
    async fn test_species_by_id_requires_redirect() {
        let router = Router::new().route(
            "/api/v3/taxonredirect/{id}",
            get(|| async { StatusCode::NOT_FOUND }),
        );
        let client = client_for(router).await;
        assert!(matches!(
            client.species_by_id(1).await,
            Err(RedListError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_species_by_id_ensured_checks_host() {
        let router = Router::new()
            .route(
                "/api/v3/taxonredirect/{id}",
                get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/search/99")]) }),
            )
            .route("/search/{id}", get(|| async { StatusCode::OK }));
        let client = client_for(router).await;
        assert!(matches!(
            client.species_by_id_ensured(99).await,
            Err(RedListError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_country_occurrences() {
        let router = Router::new().route(
            "/api/v3/species/countries/id/{id}",
            get(|| async {
                Json(json!({
                    "count": 1,
                    "name": "12419",
                    "result": [{
                        "code": "JP",
                        "country": "Japan",
                        "presence": "Extinct Post-1500",
                        "origin": "Native",
                        "distribution_code": "Regionally Extinct"
                    }]
                }))
            }),
        );
        let client = client_for(router).await;

        let countries = client.country_occurrences(12419).await.unwrap();
        assert_eq!(countries[0].code, "JP");
        assert_eq!(countries[0].presence.as_deref(), Some("Extinct Post-1500"));
    }

    #[tokio::test]
    async fn test_malformed_classification_row() {
        let router = Router::new().route(
            "/api/v3/measures/species/id/{id}",
            get(|| async { Json(json!({"id": "1", "result": [{"title": "no code"}]})) }),
        );
        let client = client_for(router).await;
        match client.conservation_measures(1).await {
            Err(RedListError::Code(e)) => {
                assert_eq!(e.to_string(), "Record is missing required field 'code'")
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
