//! Japanese common name to scientific name lookup

use crate::error::TranslationError;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Dictionary of Japanese names (和名) to scientific names
///
/// Stored as two tab-separated columns, Japanese name first. Later rows win
/// when a name appears twice.
#[derive(Debug, Clone, Default)]
pub struct NameDictionary {
    names: HashMap<String, String>,
}

impl NameDictionary {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TranslationError> {
        let path = path.as_ref();
        let io_err = |source| TranslationError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let dictionary = Self::from_reader(BufReader::new(file)).map_err(io_err)?;
        info!(path = %path.display(), names = dictionary.len(), "Loaded ja2sci dictionary");
        Ok(dictionary)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut names = HashMap::new();
        for line in reader.lines() {
            let line = line?;
            let mut columns = line.split('\t');
            if let (Some(japanese), Some(scientific)) = (columns.next(), columns.next()) {
                let (japanese, scientific) = (japanese.trim(), scientific.trim());
                if !japanese.is_empty() && !scientific.is_empty() {
                    names.insert(japanese.to_string(), scientific.to_string());
                }
            }
        }
        Ok(Self { names })
    }

    /// Scientific name for a Japanese name
    pub fn convert(&self, japanese: &str) -> Option<&str> {
        self.names.get(japanese.trim()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert() {
        let data = "カワウソ\tLutra lutra\nコツメカワウソ\tAonyx cinerea\n";
        let dictionary = NameDictionary::from_reader(data.as_bytes()).unwrap();

        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.convert("コツメカワウソ"), Some("Aonyx cinerea"));
        assert_eq!(dictionary.convert("タヌキ"), None);
    }

    #[test]
    fn test_later_rows_override() {
        let data = "ニホンカワウソ\tLutra lutra whiteleyi\nニホンカワウソ\tLutra nippon\nbroken-row\n";
        let dictionary = NameDictionary::from_reader(data.as_bytes()).unwrap();

        assert_eq!(dictionary.len(), 1);
        assert_eq!(dictionary.convert("ニホンカワウソ"), Some("Lutra nippon"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(NameDictionary::load(dir.path().join("ja2sci.tsv")).is_err());
    }
}
