//! Data types for Red List v3 API responses

use crate::error::RedListError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Red List conservation categories, including the 1994 lower-risk subcategories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RedListCategory {
    /// Extinct
    EX,
    /// Extinct in the Wild
    EW,
    /// Critically Endangered
    CR,
    /// Endangered
    EN,
    /// Vulnerable
    VU,
    /// Near Threatened
    NT,
    /// Least Concern
    LC,
    /// Data Deficient
    DD,
    /// Lower Risk / least concern
    #[serde(rename = "LR/lc")]
    LrLc,
    /// Lower Risk / near threatened
    #[serde(rename = "LR/nt")]
    LrNt,
    /// Lower Risk / conservation dependent
    #[serde(rename = "LR/cd")]
    LrCd,
}

impl RedListCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EX => "EX",
            Self::EW => "EW",
            Self::CR => "CR",
            Self::EN => "EN",
            Self::VU => "VU",
            Self::NT => "NT",
            Self::LC => "LC",
            Self::DD => "DD",
            Self::LrLc => "LR/lc",
            Self::LrNt => "LR/nt",
            Self::LrCd => "LR/cd",
        }
    }

    /// Form used in `/species/category/{category}` (no slash)
    pub fn path_segment(self) -> String {
        self.as_str().replace('/', "")
    }
}

impl FromStr for RedListCategory {
    type Err = RedListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EX" => Ok(Self::EX),
            "EW" => Ok(Self::EW),
            "CR" => Ok(Self::CR),
            "EN" => Ok(Self::EN),
            "VU" => Ok(Self::VU),
            "NT" => Ok(Self::NT),
            "LC" => Ok(Self::LC),
            "DD" => Ok(Self::DD),
            "LR/lc" => Ok(Self::LrLc),
            "LR/nt" => Ok(Self::LrNt),
            "LR/cd" => Ok(Self::LrCd),
            other => Err(RedListError::InvalidCategory(other.to_string())),
        }
    }
}

impl fmt::Display for RedListCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full assessment summary from `/species/id/{id}` and `/species/{name}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesInfo {
    #[serde(deserialize_with = "deserialize_id")]
    pub taxonid: u64,
    pub scientific_name: String,
    pub kingdom: Option<String>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub order: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub main_common_name: Option<String>,
    pub authority: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub published_year: Option<u64>,
    pub assessment_date: Option<String>,
    pub category: Option<String>,
    pub criteria: Option<String>,
    pub population_trend: Option<String>,
    pub marine_system: Option<bool>,
    pub freshwater_system: Option<bool>,
    pub terrestrial_system: Option<bool>,
    pub assessor: Option<String>,
    pub reviewer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub aoo_km2: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub eoo_km2: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub elevation_upper: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub elevation_lower: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub depth_upper: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub depth_lower: Option<String>,
    pub errata_flag: Option<bool>,
    pub errata_reason: Option<String>,
    pub amended_flag: Option<bool>,
    pub amended_reason: Option<String>,
}

impl SpeciesInfo {
    /// Authority without the enclosing parentheses used for recombined names
    ///
    /// `"(Linnaeus, 1758)"` becomes `"Linnaeus, 1758"`.
    pub fn authority_normalized(&self) -> Option<&str> {
        let authority = self.authority.as_deref()?;
        Some(
            authority
                .strip_prefix('(')
                .and_then(|a| a.strip_suffix(')'))
                .unwrap_or(authority),
        )
    }
}

/// A synonym row from `/species/synonym/{name}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synonym {
    #[serde(deserialize_with = "deserialize_id")]
    pub accepted_id: u64,
    pub accepted_name: String,
    pub authority: Option<String>,
    pub synonym: String,
    pub syn_authority: Option<String>,
}

/// A species row from the category and country listings
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpeciesListing {
    #[serde(deserialize_with = "deserialize_id")]
    pub(crate) taxonid: u64,
    pub(crate) scientific_name: String,
    pub(crate) category: Option<String>,
}

/// A country row from `/species/countries/id/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountryOccurrence {
    /// Two-character ISO country code
    pub code: String,
    pub country: Option<String>,
    /// e.g. Extant, Possibly Extinct
    pub presence: Option<String>,
    /// e.g. Native, Introduced, Origin Uncertain
    pub origin: Option<String>,
    pub distribution_code: Option<String>,
}

/// Envelope shared by every v3 endpoint
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResultResponse<T> {
    #[serde(default)]
    pub(crate) count: Option<u64>,
    #[serde(default = "Vec::new")]
    pub(crate) result: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VersionResponse {
    pub(crate) version: String,
}

/// A Red List species
///
/// Only the taxon id is guaranteed; the name and assessment summary are
/// filled in by whichever lookup produced the value.
#[derive(Debug, Clone)]
pub struct Species {
    pub taxonid: u64,
    pub scientific_name: Option<String>,
    pub category: Option<String>,
    pub info: Option<SpeciesInfo>,
    pub synonyms: Vec<Synonym>,
}

impl Species {
    pub fn new(taxonid: u64, scientific_name: Option<String>) -> Self {
        Self {
            taxonid,
            scientific_name,
            category: None,
            info: None,
            synonyms: Vec::new(),
        }
    }

    pub(crate) fn from_info(info: SpeciesInfo) -> Self {
        Self {
            taxonid: info.taxonid,
            scientific_name: Some(info.scientific_name.clone()),
            category: info.category.clone(),
            info: Some(info),
            synonyms: Vec::new(),
        }
    }

    pub(crate) fn set_info(&mut self, info: SpeciesInfo) {
        self.scientific_name = Some(info.scientific_name.clone());
        self.category = info.category.clone();
        self.info = Some(info);
    }

    pub fn has_info(&self) -> bool {
        self.info.is_some()
    }
}

impl From<SpeciesListing> for Species {
    fn from(listing: SpeciesListing) -> Self {
        Self {
            category: listing.category,
            ..Self::new(listing.taxonid, Some(listing.scientific_name))
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(category) = &self.category {
            write!(f, "[{}]", category)?;
        }
        match &self.scientific_name {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "NameUnknown(id={})", self.taxonid),
        }
    }
}

/// Ids arrive as numbers or numeric strings
fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_opt_id(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("missing taxon id"))
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = Option<u64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer id")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            u64::try_from(v).map(Some).map_err(de::Error::custom)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.trim().parse::<u64>().map(Some).map_err(de::Error::custom)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Measurements come back as strings, numbers or null depending on the assessment
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
