//! Single habitat, threat or conservation-measure entries

use crate::code::Code;
use crate::error::CodeError;
use crate::translation::TranslationTable;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Red List classification scheme an entry belongs to
///
/// See <https://www.iucnredlist.org/resources/classification-schemes>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Habitat,
    Threat,
    ConservationMeasure,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Self::Habitat, Self::Threat, Self::ConservationMeasure];

    /// Record field carrying the English description
    pub fn title_field(self) -> &'static str {
        match self {
            Self::Habitat => "habitat",
            Self::Threat | Self::ConservationMeasure => "title",
        }
    }

    /// Sub-directory of the dictionary root holding this scheme's tables
    pub fn dictionary_dir(self) -> &'static str {
        match self {
            Self::Habitat => "habitats",
            Self::Threat => "threats",
            Self::ConservationMeasure => "conservation_measures",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Habitat => "Habitat",
            Self::Threat => "Threat",
            Self::ConservationMeasure => "ConservationMeasure",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HabitatDetails {
    pub suitability: Option<String>,
    pub season: Option<String>,
    pub major_importance: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThreatDetails {
    pub timing: Option<String>,
    pub scope: Option<String>,
    pub severity: Option<String>,
    pub score: Option<String>,
    pub invasive: Option<String>,
}

/// Scheme-specific fields of an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Details {
    Habitat(HabitatDetails),
    Threat(ThreatDetails),
    ConservationMeasure,
    /// Group header synthesized for a branch with no fetched record of its own
    Placeholder(Domain),
}

impl Details {
    pub fn domain(&self) -> Domain {
        match self {
            Self::Habitat(_) => Domain::Habitat,
            Self::Threat(_) => Domain::Threat,
            Self::ConservationMeasure => Domain::ConservationMeasure,
            Self::Placeholder(domain) => *domain,
        }
    }
}

/// One classification node, e.g. threat `5.4.4`
///
/// Two entries are equal when their codes are equal; the remaining fields
/// are payload.
#[derive(Debug, Clone)]
pub struct CodeEntry {
    code: Code,
    title: Option<String>,
    details: Details,
    extra: Map<String, Value>,
}

impl CodeEntry {
    /// Build an entry from one row of a Red List API response
    ///
    /// `code` is required and may be a string or an integer. Fields that are
    /// not modelled for the domain are kept in [`CodeEntry::extra`].
    pub fn from_record(domain: Domain, record: &Map<String, Value>) -> Result<Self, CodeError> {
        let mut extra = record.clone();

        let code = match extra.remove("code") {
            Some(Value::String(s)) => Code::parse(&s)?,
            Some(Value::Number(n)) => Code::parse(&n.to_string())?,
            Some(Value::Null) | None => return Err(CodeError::MissingField("code".to_string())),
            Some(other) => return Err(CodeError::InvalidCode(other.to_string())),
        };

        let title = take_text(&mut extra, domain.title_field());

        let details = match domain {
            Domain::Habitat => Details::Habitat(HabitatDetails {
                suitability: take_text(&mut extra, "suitability"),
                season: take_text(&mut extra, "season"),
                major_importance: take_text(&mut extra, "majorimportance"),
            }),
            Domain::Threat => Details::Threat(ThreatDetails {
                timing: take_text(&mut extra, "timing"),
                scope: take_text(&mut extra, "scope"),
                severity: take_text(&mut extra, "severity"),
                score: take_text(&mut extra, "score"),
                invasive: take_text(&mut extra, "invasive"),
            }),
            Domain::ConservationMeasure => Details::ConservationMeasure,
        };

        Ok(Self {
            code,
            title,
            details,
            extra,
        })
    }

    /// Same as [`CodeEntry::from_record`]; anything but a JSON object has no `code`
    pub fn from_value(domain: Domain, value: &Value) -> Result<Self, CodeError> {
        match value {
            Value::Object(record) => Self::from_record(domain, record),
            _ => Err(CodeError::MissingField("code".to_string())),
        }
    }

    /// A structural group header carrying only a code
    pub fn placeholder(domain: Domain, code: Code) -> Self {
        Self {
            code,
            title: None,
            details: Details::Placeholder(domain),
            extra: Map::new(),
        }
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn details(&self) -> &Details {
        &self.details
    }

    pub fn domain(&self) -> Domain {
        self.details.domain()
    }

    pub fn rank(&self) -> usize {
        self.code.rank()
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.details, Details::Placeholder(_))
    }

    /// Response fields with no dedicated accessor
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Localized description for this code, if the table has one
    pub fn translate<'t>(&self, table: &'t TranslationTable, language: &str) -> Option<&'t str> {
        table.lookup(language, self.code.as_str())
    }
}

/// Remove `key` and render scalar values as text; `null` becomes `None`
fn take_text(record: &mut Map<String, Value>, key: &str) -> Option<String> {
    match record.remove(key)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl PartialEq for CodeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for CodeEntry {}

impl Hash for CodeEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for CodeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{}: {}", self.code, title),
            None => write!(f, "{}", self.code),
        }
    }
}
