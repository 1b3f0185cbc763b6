//! Query and response types for `/taxa`

use serde::{Deserialize, Serialize};

/// Filters for `GET /taxa`
///
/// Every filter is optional; unset filters are left out of the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxaQuery {
    /// Name must begin with this value
    pub q: Option<String>,
    pub is_active: Option<bool>,
    /// Only these taxa or their descendants
    pub taxon_id: Vec<u64>,
    pub parent_id: Option<u64>,
    pub rank: Vec<String>,
    /// 70 kingdom, 60 phylum, 50 class, 40 order, 30 family, 20 genus, 10 species, 5 subspecies
    pub rank_level: Option<u32>,
    pub id_above: Option<u64>,
    pub id_below: Option<u64>,
    pub per_page: Option<u32>,
    /// Locale for common names
    pub locale: Option<String>,
    /// Place for regional common names
    pub preferred_place_id: Option<u64>,
    pub only_id: Option<bool>,
}

impl TaxaQuery {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    pub fn is_active(mut self, active: bool) -> Self {
        self.is_active = Some(active);
        self
    }

    pub fn taxon_ids(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.taxon_id = ids.into_iter().collect();
        self
    }

    pub fn parent_id(mut self, id: u64) -> Self {
        self.parent_id = Some(id);
        self
    }

    pub fn ranks<S: Into<String>>(mut self, ranks: impl IntoIterator<Item = S>) -> Self {
        self.rank = ranks.into_iter().map(Into::into).collect();
        self
    }

    pub fn rank_level(mut self, level: u32) -> Self {
        self.rank_level = Some(level);
        self
    }

    pub fn id_above(mut self, id: u64) -> Self {
        self.id_above = Some(id);
        self
    }

    pub fn id_below(mut self, id: u64) -> Self {
        self.id_below = Some(id);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn preferred_place_id(mut self, id: u64) -> Self {
        self.preferred_place_id = Some(id);
        self
    }

    pub fn only_id(mut self, only_id: bool) -> Self {
        self.only_id = Some(only_id);
        self
    }

    /// Query parameters in request order, lists comma-joined
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        if let Some(active) = self.is_active {
            pairs.push(("is_active", active.to_string()));
        }
        if !self.taxon_id.is_empty() {
            pairs.push(("taxon_id", join(&self.taxon_id)));
        }
        if let Some(id) = self.parent_id {
            pairs.push(("parent_id", id.to_string()));
        }
        if !self.rank.is_empty() {
            pairs.push(("rank", self.rank.join(",")));
        }
        if let Some(level) = self.rank_level {
            pairs.push(("rank_level", level.to_string()));
        }
        if let Some(id) = self.id_above {
            pairs.push(("id_above", id.to_string()));
        }
        if let Some(id) = self.id_below {
            pairs.push(("id_below", id.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        if let Some(locale) = &self.locale {
            pairs.push(("locale", locale.clone()));
        }
        if let Some(id) = self.preferred_place_id {
            pairs.push(("preferred_place_id", id.to_string()));
        }
        if let Some(only_id) = self.only_id {
            pairs.push(("only_id", only_id.to_string()));
        }

        pairs
    }
}

fn join(ids: &[u64]) -> String {
    ids.iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// A taxon from `/taxa`
///
/// Fields not modelled here are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxon {
    pub id: u64,
    pub name: Option<String>,
    pub rank: Option<String>,
    pub rank_level: Option<f64>,
    pub preferred_common_name: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub ancestor_ids: Vec<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TaxaResponse {
    #[serde(default)]
    pub(crate) total_results: u64,
    #[serde(default)]
    pub(crate) results: Vec<Taxon>,
}
