//! Data types for GBIF API responses

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name usage row from `/species?name=` and `/species/{key}/synonyms`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameUsage {
    #[serde(default, deserialize_with = "deserialize_key")]
    pub key: Option<u64>,
    /// Backbone key; absent when it equals `key`
    #[serde(default, deserialize_with = "deserialize_key")]
    pub nub_key: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_key")]
    pub accepted_key: Option<u64>,
    pub scientific_name: Option<String>,
    pub canonical_name: Option<String>,
    /// Accepted species name for synonym rows
    pub species: Option<String>,
    pub accepted: Option<String>,
    pub rank: Option<String>,
    pub taxonomic_status: Option<String>,
    pub kingdom: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
}

impl NameUsage {
    /// Backbone key, falling back to the usage's own key
    pub fn backbone_key(&self) -> Option<u64> {
        self.nub_key.or(self.key)
    }
}

/// One page of a GBIF listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingResponse<T> {
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    /// Missing on unpaged listings, which are always complete
    #[serde(default = "default_end_of_records")]
    pub end_of_records: bool,
    pub count: Option<u64>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

fn default_end_of_records() -> bool {
    true
}

/// Species detail from GBIF v1 `/species/{id}` endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesDetail {
    pub key: Option<u64>,
    pub nub_key: Option<u64>,
    pub scientific_name: Option<String>,
    pub canonical_name: Option<String>,
    pub authorship: Option<String>,
    pub vernacular_name: Option<String>,
    pub rank: Option<String>,
    pub taxonomic_status: Option<String>,
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub species: Option<String>,
    pub num_descendants: Option<u64>,
    pub extinct: Option<bool>,
}

impl SpeciesDetail {
    /// Higher classification from kingdom down to genus, skipping gaps
    pub fn lineage(&self) -> Vec<&str> {
        [
            &self.kingdom,
            &self.phylum,
            &self.class,
            &self.order,
            &self.family,
            &self.genus,
        ]
        .into_iter()
        .filter_map(|rank| rank.as_deref())
        .collect()
    }
}

/// A backbone species resolved from a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GbifSpecies {
    pub key: u64,
    pub name: Option<String>,
}

impl GbifSpecies {
    pub fn new(key: u64, name: Option<String>) -> Self {
        Self { key, name }
    }
}

impl fmt::Display for GbifSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} (key={})", name, self.key),
            None => write!(f, "key={}", self.key),
        }
    }
}

/// Keys arrive as numbers or numeric strings
fn deserialize_key<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeyVisitor;

    impl<'de> Visitor<'de> for KeyVisitor {
        type Value = Option<u64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer representing a key")
        }

        fn visit_u64<E>(self, v: u64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v))
        }

        fn visit_i64<E>(self, v: i64) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            u64::try_from(v).map(Some).map_err(de::Error::custom)
        }

        fn visit_str<E>(self, v: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            v.parse::<u64>().map(Some).map_err(de::Error::custom)
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(KeyVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backbone_key_fallback() {
        let with_nub: NameUsage =
            serde_json::from_value(json!({"key": 100, "nubKey": 5219243})).unwrap();
        let without_nub: NameUsage = serde_json::from_value(json!({"key": "5219243"})).unwrap();

        assert_eq!(with_nub.backbone_key(), Some(5219243));
        assert_eq!(without_nub.backbone_key(), Some(5219243));
    }

    #[test]
    fn test_paging_defaults() {
        let page: PagingResponse<NameUsage> = serde_json::from_value(json!({
            "offset": 0,
            "limit": 100,
            "results": [{"key": 1, "canonicalName": "Mustela lutra"}]
        }))
        .unwrap();

        assert!(page.end_of_records);
        assert_eq!(page.results[0].canonical_name.as_deref(), Some("Mustela lutra"));
    }

    #[test]
    fn test_lineage_skips_missing_ranks() {
        let detail: SpeciesDetail = serde_json::from_value(json!({
            "key": 5219243,
            "kingdom": "Animalia",
            "phylum": "Chordata",
            "order": "Carnivora",
            "family": "Mustelidae",
            "genus": "Lutra"
        }))
        .unwrap();
        assert_eq!(
            detail.lineage(),
            vec!["Animalia", "Chordata", "Carnivora", "Mustelidae", "Lutra"]
        );
    }

    #[test]
    fn test_species_display() {
        let species = GbifSpecies::new(5219243, Some("Lutra lutra".to_string()));
        assert_eq!(species.to_string(), "Lutra lutra (key=5219243)");
        assert_eq!(GbifSpecies::new(1, None).to_string(), "key=1");
    }
}
