//! Trait bank records
//!
//! A trait links a page to a predicate term (the kind of information) and a
//! value. Categorical values are object or literal terms; numeric values are
//! a normalized measurement with a units term.

use crate::page::Page;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Lightweight handle on a predicate: just its URI and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraitProxy {
    pub uri: String,
    pub name: String,
}

impl fmt::Display for TraitProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Restricts [`Page::traits`] to one predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitFilter {
    pub name: String,
    /// Also match the predicate URI when set
    pub uri: Option<String>,
}

impl TraitFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uri: None,
        }
    }
}

impl From<TraitProxy> for TraitFilter {
    fn from(proxy: TraitProxy) -> Self {
        Self {
            name: proxy.name,
            uri: Some(proxy.uri),
        }
    }
}

/// A term node (predicate, object, units or literal)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Term {
    pub uri: Option<String>,
    pub name: Option<String>,
    pub definition: Option<String>,
    pub attribution: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub position: Option<String>,
    #[serde(rename = "type")]
    pub term_type: Option<String>,
    pub used_for: Option<String>,
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name.as_deref().unwrap_or(""))
    }
}

/// The content partner resource a trait was supplied by
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default, deserialize_with = "deserialize_text")]
    pub resource_id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TraitProperties {
    #[serde(default, deserialize_with = "deserialize_text")]
    eol_pk: Option<String>,
    /// Measurement normalized and rounded by EOL
    #[serde(default, deserialize_with = "deserialize_text")]
    normal_measurement: Option<String>,
    source: Option<String>,
    #[serde(rename = "type")]
    trait_type: Option<String>,
}

/// One trait of a page
#[derive(Debug, Clone)]
pub struct Trait {
    pub page: Page,
    pub eol_pk: Option<String>,
    pub measurement: Option<String>,
    pub source: Option<String>,
    /// measurement, association, metadata, value or empty
    pub trait_type: Option<String>,
    pub resource: Resource,
    pub predicate: Term,
    pub object: Option<Term>,
    pub units: Option<Term>,
    pub literal: Option<Term>,
}

impl Trait {
    /// Build from one row of `page, trait, resource, predicate, object, units, literal`
    pub(crate) fn from_row(row: &[Value]) -> serde_json::Result<Self> {
        let cell = |i: usize| row.get(i).cloned().unwrap_or(Value::Null);
        let optional_term = |i: usize| -> serde_json::Result<Option<Term>> {
            match cell(i) {
                Value::Null => Ok(None),
                v => serde_json::from_value(v).map(Some),
            }
        };
        let properties: TraitProperties = match cell(1) {
            Value::Null => TraitProperties::default(),
            v => serde_json::from_value(v)?,
        };

        Ok(Self {
            page: Page::from_properties(&cell(0)),
            eol_pk: properties.eol_pk,
            measurement: properties.normal_measurement,
            source: properties.source,
            trait_type: properties.trait_type,
            resource: match cell(2) {
                Value::Null => Resource::default(),
                v => serde_json::from_value(v)?,
            },
            predicate: match cell(3) {
                Value::Null => Term::default(),
                v => serde_json::from_value(v)?,
            },
            object: optional_term(4)?,
            units: optional_term(5)?,
            literal: optional_term(6)?,
        })
    }

    pub fn category(&self) -> Option<&str> {
        self.predicate.name.as_deref()
    }

    pub fn category_definition(&self) -> Option<&str> {
        self.predicate.definition.as_deref()
    }

    pub fn category_definition_uri(&self) -> Option<&str> {
        self.predicate.uri.as_deref()
    }

    /// Units term when this is a numeric trait
    fn measured_units(&self) -> Option<(&str, &Term)> {
        Some((self.measurement.as_deref()?, self.units.as_ref()?))
    }

    /// The term describing the value: units, else object, else literal
    fn value_term(&self) -> Option<&Term> {
        match self.measured_units() {
            Some((_, units)) => Some(units),
            None => self.object.as_ref().or(self.literal.as_ref()),
        }
    }

    /// `"<measurement> <units>"`, else the object name, else the literal name
    pub fn value(&self) -> Option<String> {
        if let Some((measurement, units)) = self.measured_units() {
            return Some(match units.name.as_deref() {
                Some(name) => format!("{} {}", measurement, name),
                None => measurement.to_string(),
            });
        }
        self.value_term()?.name.clone()
    }

    pub fn value_definition(&self) -> Option<&str> {
        self.value_term()?.definition.as_deref()
    }

    pub fn value_definition_uri(&self) -> Option<&str> {
        self.value_term()?.uri.as_deref()
    }
}

impl PartialEq for Trait {
    fn eq(&self, other: &Self) -> bool {
        self.eol_pk == other.eol_pk
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.category().unwrap_or("?"),
            self.value().unwrap_or_default()
        )
    }
}

/// Strings, numbers and booleans all become text
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
