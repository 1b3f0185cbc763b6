use crate::error::{CliError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// CLI configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub redlist_token: Option<String>,
    pub eol_token: Option<String>,
    /// Root holding `habitats/`, `threats/` and `conservation_measures/`
    pub dictionary_dir: PathBuf,
    pub ja2sci_path: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let redlist_token = token(var("REDLIST_TOKEN"), var("REDLIST_TOKEN_FILE"))?;
        let eol_token = token(var("EOL_TOKEN"), var("EOL_TOKEN_FILE"))?;

        let dictionary_dir = var("SPSEARCH_DICTIONARY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./dictionary"));

        let ja2sci_path = var("SPSEARCH_JA2SCI")
            .map(PathBuf::from)
            .unwrap_or_else(|| dictionary_dir.join("ja2sci.tsv"));

        let http_timeout = match var("HTTP_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse()
                .map(Duration::from_secs)
                .map_err(|_| CliError::Config(format!("HTTP_TIMEOUT_SECS must be an integer, got '{}'", secs)))?,
            None => Duration::from_secs(30),
        };

        Ok(Self {
            redlist_token,
            eol_token,
            dictionary_dir,
            ja2sci_path,
            http_timeout,
        })
    }

    pub fn require_redlist_token(&self) -> Result<&str> {
        self.redlist_token
            .as_deref()
            .ok_or_else(|| CliError::Config("Set REDLIST_TOKEN or REDLIST_TOKEN_FILE".to_string()))
    }

    pub fn require_eol_token(&self) -> Result<&str> {
        self.eol_token
            .as_deref()
            .ok_or_else(|| CliError::Config("Set EOL_TOKEN or EOL_TOKEN_FILE".to_string()))
    }
}

/// An inline token wins over a token file
fn token(inline: Option<String>, file: Option<String>) -> Result<Option<String>> {
    if let Some(token) = inline {
        return Ok(Some(token.trim().to_string()));
    }
    let Some(path) = file else {
        return Ok(None);
    };
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| CliError::Config(format!("Cannot read token file {}: {}", path, e)))?;
    Ok(Some(contents.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert!(config.redlist_token.is_none());
        assert_eq!(config.dictionary_dir, PathBuf::from("./dictionary"));
        assert_eq!(config.ja2sci_path, PathBuf::from("./dictionary/ja2sci.tsv"));
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.require_redlist_token().is_err());
    }

    #[test]
    fn test_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eol_token");
        std::fs::write(&path, "abc.def.ghi\n").unwrap();

        let config = config_from(&[
            ("EOL_TOKEN_FILE", path.to_str().unwrap()),
            ("REDLIST_TOKEN", " inline "),
            ("SPSEARCH_DICTIONARY_DIR", "/srv/dict"),
        ])
        .unwrap();

        assert_eq!(config.require_eol_token().unwrap(), "abc.def.ghi");
        assert_eq!(config.require_redlist_token().unwrap(), "inline");
        assert_eq!(config.ja2sci_path, PathBuf::from("/srv/dict/ja2sci.tsv"));
    }

    #[test]
    fn test_missing_token_file() {
        let err = config_from(&[("REDLIST_TOKEN_FILE", "/nonexistent/token")]).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_bad_timeout() {
        assert!(config_from(&[("HTTP_TIMEOUT_SECS", "soon")]).is_err());
        let config = config_from(&[("HTTP_TIMEOUT_SECS", "5")]).unwrap();
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }
}
