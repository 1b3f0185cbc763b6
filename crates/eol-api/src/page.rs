//! EOL taxon pages in the trait bank

use crate::cypher::{cypher_string, CypherClient};
use crate::error::{EolError, Result};
use crate::traits::{Trait, TraitFilter, TraitProxy};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// A page, identified by its id, its canonical name, or both
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page_id: Option<u64>,
    pub canonical: Option<String>,
}

impl Page {
    pub fn new(page_id: Option<u64>, canonical: Option<String>) -> Self {
        Self { page_id, canonical }
    }

    /// Read `page_id` and `canonical` from a node's properties
    pub(crate) fn from_properties(properties: &Value) -> Self {
        Self {
            page_id: properties.get("page_id").and_then(|v| match v {
                Value::String(s) => s.parse().ok(),
                v => v.as_u64(),
            }),
            canonical: properties
                .get("canonical")
                .and_then(Value::as_str)
                .map(str::to_string),
        }
    }

    pub async fn from_id(client: &CypherClient, page_id: u64) -> Result<Self> {
        let query = format!("MATCH (p:Page {{page_id: {}}})\nRETURN properties(p)", page_id);
        Self::fetch(client, &query, || format!("Page {} not found", page_id)).await
    }

    pub async fn from_name(client: &CypherClient, canonical: &str) -> Result<Self> {
        let query = format!(
            "MATCH (p:Page {{canonical: {}}})\nRETURN properties(p)",
            cypher_string(canonical)
        );
        Self::fetch(client, &query, || format!("Page for '{}' not found", canonical)).await
    }

    async fn fetch(
        client: &CypherClient,
        query: &str,
        missing: impl FnOnce() -> String,
    ) -> Result<Self> {
        let result = client.execute(query).await?;
        match result.first_cell() {
            Some(properties @ Value::Object(_)) => Ok(Self::from_properties(properties)),
            _ => Err(EolError::NotFound(missing())),
        }
    }

    /// Cypher node pattern selecting this page, by id when known
    fn selector(&self) -> Result<String> {
        match (&self.page_id, &self.canonical) {
            (Some(id), _) => Ok(format!("{{page_id: {}}}", id)),
            (None, Some(name)) => Ok(format!("{{canonical: {}}}", cypher_string(name))),
            (None, None) => Err(EolError::NotFound(
                "Page has neither an id nor a name".to_string(),
            )),
        }
    }

    /// Predicates (trait categories) available for this page
    pub async fn categories(&self, client: &CypherClient) -> Result<Vec<TraitProxy>> {
        let query = format!(
            "MATCH (p:Page {})-[:trait]->(t:Trait)-[:predicate]->(pred:Term)\n\
             RETURN COLLECT(DISTINCT [pred.uri, pred.name])",
            self.selector()?
        );
        let result = client.execute(&query).await?;

        let Some(pairs) = result.first_cell().and_then(Value::as_array) else {
            return Ok(Vec::new());
        };
        Ok(pairs
            .iter()
            .filter_map(|pair| {
                let uri = pair.get(0)?.as_str()?;
                let name = pair.get(1)?.as_str()?;
                Some(TraitProxy {
                    uri: uri.to_string(),
                    name: name.to_string(),
                })
            })
            .collect())
    }

    /// Traits of this page, optionally limited to one predicate
    pub async fn traits(
        &self,
        client: &CypherClient,
        filter: Option<&TraitFilter>,
    ) -> Result<Vec<Trait>> {
        let query = traits_query(&self.selector()?, filter);
        let result = client.execute(&query).await?;

        let traits = result
            .data
            .iter()
            .map(|row| Trait::from_row(row))
            .collect::<serde_json::Result<Vec<_>>>()?;
        debug!(page = %self, count = traits.len(), "Fetched EOL traits");
        Ok(traits)
    }
}

fn traits_query(selector: &str, filter: Option<&TraitFilter>) -> String {
    let condition = match filter {
        Some(TraitFilter { name, uri: Some(uri) }) => format!(
            "WHERE pred.name = {} AND pred.uri = {}\n",
            cypher_string(name),
            cypher_string(uri)
        ),
        Some(TraitFilter { name, uri: None }) => {
            format!("WHERE pred.name = {}\n", cypher_string(name))
        }
        None => String::new(),
    };

    format!(
        "MATCH (p:Page {selector})-[:trait]->(t:Trait),\n\
         (t)-[:supplier]->(r:Resource),\n\
         (t)-[:predicate]->(pred:Term)\n\
         {condition}\
         OPTIONAL MATCH (t)-[:object_term]->(obj:Term)\n\
         OPTIONAL MATCH (t)-[:normal_units_term]->(units:Term)\n\
         OPTIONAL MATCH (lit:Term) WHERE lit.uri = t.literal\n\
         RETURN properties(p), properties(t), properties(r), properties(pred), \
         properties(obj), properties(units), properties(lit)"
    )
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.canonical, self.page_id) {
            (Some(name), _) => f.write_str(name),
            (None, Some(id)) => write!(f, "page {}", id),
            (None, None) => f.write_str("unknown page"),
        }
    }
}
