//! EOL trait bank Cypher service

use crate::error::{EolError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Tabular result of a Cypher query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CypherResult {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl CypherResult {
    /// Value of the first column of the first row
    pub fn first_cell(&self) -> Option<&Value> {
        self.data.first()?.first()
    }

    fn from_value(value: Value) -> Result<Self> {
        let has_shape = value.get("columns").is_some() && value.get("data").is_some();
        if !has_shape {
            return Err(EolError::Unparsable(
                "response lacks 'columns' or 'data'".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Concatenate chunk results that share the same columns
    fn merge(mut chunks: Vec<CypherResult>) -> Result<Self> {
        if chunks.len() <= 1 {
            return Ok(chunks.pop().unwrap_or_default());
        }
        let columns = chunks[0].columns.clone();
        if chunks.iter().any(|c| c.columns != columns) {
            return Err(EolError::Unparsable(
                "chunks returned different columns".to_string(),
            ));
        }
        let data = chunks.into_iter().flat_map(|c| c.data).collect();
        Ok(Self { columns, data })
    }
}

/// Quote `s` as a Cypher string literal
pub fn cypher_string(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Client for `https://eol.org/service/cypher`
///
/// Requires an EOL API token, sent as `Authorization: JWT <token>`.
pub struct CypherClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl CypherClient {
    pub const ENDPOINT: &'static str = "https://eol.org/service/cypher";

    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(token, Self::ENDPOINT, Duration::from_secs(30))
    }

    pub fn with_endpoint(token: impl Into<String>, endpoint: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: Url::parse(endpoint)?,
            token: token.into().trim().to_string(),
        })
    }

    /// Run a single query
    pub async fn execute(&self, query: &str) -> Result<CypherResult> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("query", query);

        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, format!("JWT {}", self.token))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EolError::Status(status.as_u16()));
        }

        let value: Value = serde_json::from_slice(&response.bytes().await?)?;
        CypherResult::from_value(value)
    }

    /// Run `query` in chunks of `chunk` rows until `items` rows are requested
    ///
    /// Each chunk appends `SKIP n LIMIT m` to the query, so the query must not
    /// end in its own `LIMIT`. Stops early once a chunk comes back short.
    pub async fn execute_paginated(
        &self,
        query: &str,
        items: usize,
        chunk: usize,
    ) -> Result<CypherResult> {
        let chunk = chunk.max(1);
        let mut chunks = Vec::new();
        let mut skip = 0;

        while skip < items {
            let limit = chunk.min(items - skip);
            let paged = format!("{}\nSKIP {} LIMIT {}", query.trim_end(), skip, limit);
            let result = self.execute(&paged).await?;
            debug!(skip, limit, rows = result.data.len(), "Fetched Cypher chunk");

            let short = result.data.len() < limit;
            chunks.push(result);
            if short {
                break;
            }
            skip += limit;
        }

        CypherResult::merge(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn client_for(router: Router) -> CypherClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        CypherClient::with_endpoint(
            "secret\n",
            &format!("http://{}/service/cypher", addr),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn parse_skip_limit(query: &str) -> (usize, usize) {
        let tail = query.rsplit('\n').next().unwrap();
        let parts: Vec<&str> = tail.split_whitespace().collect();
        assert_eq!(parts[0], "SKIP");
        (parts[1].parse().unwrap(), parts[3].parse().unwrap())
    }

    #[test]
    fn test_cypher_string_escapes() {
        assert_eq!(cypher_string("Lutra lutra"), "\"Lutra lutra\"");
        assert_eq!(cypher_string("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }

    #[test]
    fn test_merge_rejects_mismatched_columns() {
        let a = CypherResult {
            columns: vec!["a".to_string()],
            data: vec![vec![json!(1)]],
        };
        let b = CypherResult {
            columns: vec!["b".to_string()],
            data: vec![vec![json!(2)]],
        };
        assert!(matches!(
            CypherResult::merge(vec![a, b]),
            Err(EolError::Unparsable(_))
        ));
    }

    #[test]
    fn test_from_value_requires_shape() {
        assert!(matches!(
            CypherResult::from_value(json!({"errors": ["bad query"]})),
            Err(EolError::Unparsable(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_sends_jwt() {
        let router = Router::new().route(
            "/service/cypher",
            get(|headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
                if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("JWT secret") {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                assert_eq!(params["query"], "MATCH (n) RETURN n.name LIMIT 1");
                Json(json!({"columns": ["n.name"], "data": [["Lutra lutra"]]})).into_response()
            }),
        );
        let client = client_for(router).await;

        let result = client.execute("MATCH (n) RETURN n.name LIMIT 1").await.unwrap();
        assert_eq!(result.first_cell(), Some(&json!("Lutra lutra")));
    }

    #[tokio::test]
    async fn test_execute_paginated_merges_chunks() {
        // 250 rows available
        let router = Router::new().route(
            "/service/cypher",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let query = &params["query"];
                assert!(query.starts_with("MATCH (t:Trait) RETURN t.eol_pk\nSKIP "));
                let (skip, limit) = parse_skip_limit(query);
                let rows: Vec<_> = (skip..(skip + limit).min(250))
                    .map(|i| json!([format!("R{}", i)]))
                    .collect();
                Json(json!({"columns": ["t.eol_pk"], "data": rows}))
            }),
        );
        let client = client_for(router).await;

        let limited = client
            .execute_paginated("MATCH (t:Trait) RETURN t.eol_pk", 150, 100)
            .await
            .unwrap();
        assert_eq!(limited.data.len(), 150);
        assert_eq!(limited.data[149][0], json!("R149"));

        let all = client
            .execute_paginated("MATCH (t:Trait) RETURN t.eol_pk", 1000, 100)
            .await
            .unwrap();
        assert_eq!(all.columns, vec!["t.eol_pk"]);
        assert_eq!(all.data.len(), 250);
    }
}
