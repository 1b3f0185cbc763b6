//! Code-to-text translation tables
//!
//! Each classification scheme has a directory of delimited tables, one file
//! per language (`ja.csv`, `en.csv`, ...). The file stem names the language,
//! the first column holds the code and a fixed column holds the text.

use crate::entry::{CodeEntry, Domain};
use crate::error::TranslationError;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

const TABLE_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

/// Column layout of a translation table file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    pub delimiter: char,
    /// Zero-based column holding the translated text
    pub text_column: usize,
}

impl TableFormat {
    /// Tab-separated with the text in the third column
    pub const TAB: Self = Self {
        delimiter: '\t',
        text_column: 2,
    };

    pub fn comma(text_column: usize) -> Self {
        Self {
            delimiter: ',',
            text_column,
        }
    }
}

impl Default for TableFormat {
    fn default() -> Self {
        Self::TAB
    }
}

/// Translations keyed by language, then by code
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    languages: HashMap<String, HashMap<String, String>>,
}

impl TranslationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every table file in `dir`, one language per file
    pub fn load_dir(dir: impl AsRef<Path>, format: TableFormat) -> Result<Self, TranslationError> {
        let dir = dir.as_ref();
        let read_dir = std::fs::read_dir(dir).map_err(|source| TranslationError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut table = Self::new();
        for dir_entry in read_dir {
            let path = dir_entry
                .map_err(|source| TranslationError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();

            let is_table = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| TABLE_EXTENSIONS.contains(&e));
            let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if !is_table || !path.is_file() {
                continue;
            }

            let file = File::open(&path).map_err(|source| TranslationError::Io {
                path: path.clone(),
                source,
            })?;
            let rows = table
                .insert_language(language, BufReader::new(file), format)
                .map_err(|source| TranslationError::Io {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), language, rows, "Loaded translation table");
        }

        info!(
            dir = %dir.display(),
            languages = table.languages.len(),
            "Loaded translation tables"
        );
        Ok(table)
    }

    /// Read rows for `language` from `reader`, returning how many were kept
    pub fn insert_language<R: BufRead>(
        &mut self,
        language: &str,
        reader: R,
        format: TableFormat,
    ) -> io::Result<usize> {
        let codes = self.languages.entry(language.to_string()).or_default();
        let mut kept = 0;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_row(&line, format.delimiter);
            match (fields.first(), fields.get(format.text_column)) {
                (Some(code), Some(text)) if !code.is_empty() => {
                    codes.insert(code.clone(), text.clone());
                    kept += 1;
                }
                _ => debug!(language, line = line_no + 1, "Skipping short translation row"),
            }
        }

        Ok(kept)
    }

    pub fn insert(&mut self, language: &str, code: &str, text: &str) {
        self.languages
            .entry(language.to_string())
            .or_default()
            .insert(code.to_string(), text.to_string());
    }

    /// Text for `code` in `language`; a miss is expected and not an error
    pub fn lookup(&self, language: &str, code: &str) -> Option<&str> {
        self.languages.get(language)?.get(code).map(String::as_str)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.languages.values().all(HashMap::is_empty)
    }
}

/// Split one row, honouring double-quoted fields with `""` escapes
fn split_row(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' if quoted => quoted = false,
            '"' if field.is_empty() => quoted = true,
            c if c == delimiter && !quoted => fields.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// One translation table per classification scheme
#[derive(Debug, Clone, Default)]
pub struct Dictionaries {
    habitats: TranslationTable,
    threats: TranslationTable,
    conservation_measures: TranslationTable,
}

impl Dictionaries {
    /// Load `<root>/habitats`, `<root>/threats` and `<root>/conservation_measures`
    ///
    /// A missing scheme directory leaves that scheme untranslated.
    pub fn load(root: impl AsRef<Path>, format: TableFormat) -> Result<Self, TranslationError> {
        let root = root.as_ref();
        let mut dictionaries = Self::default();

        for domain in Domain::ALL {
            let dir = root.join(domain.dictionary_dir());
            if !dir.is_dir() {
                warn!(dir = %dir.display(), "No translation tables for {}", domain.label());
                continue;
            }
            *dictionaries.table_mut(domain) = TranslationTable::load_dir(&dir, format)?;
        }

        Ok(dictionaries)
    }

    pub fn table(&self, domain: Domain) -> &TranslationTable {
        match domain {
            Domain::Habitat => &self.habitats,
            Domain::Threat => &self.threats,
            Domain::ConservationMeasure => &self.conservation_measures,
        }
    }

    pub fn table_mut(&mut self, domain: Domain) -> &mut TranslationTable {
        match domain {
            Domain::Habitat => &mut self.habitats,
            Domain::Threat => &mut self.threats,
            Domain::ConservationMeasure => &mut self.conservation_measures,
        }
    }

    /// Translate `entry` with the table of its own scheme
    pub fn translate(&self, entry: &CodeEntry, language: &str) -> Option<&str> {
        entry.translate(self.table(entry.domain()), language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_lookup_hit_and_miss() {
        let mut table = TranslationTable::new();
        table.insert("en", "5.4.4", "Unintentional effects: (large scale)");

        assert_eq!(
            table.lookup("en", "5.4.4"),
            Some("Unintentional effects: (large scale)")
        );
        assert_eq!(table.lookup("en", "5.4.5"), None);
        assert_eq!(table.lookup("fr", "5.4.4"), None);
    }

    #[test]
    fn test_insert_language_tab_rows() {
        let data = "1.1\tResidential & commercial development\t住宅地・商業地開発\n\
                    \n\
                    1.2\tonly two columns\n\
                    1.3\tTourism & recreation areas\t観光・レクリエーション地域\n";
        let mut table = TranslationTable::new();
        let kept = table
            .insert_language("ja", data.as_bytes(), TableFormat::TAB)
            .unwrap();

        assert_eq!(kept, 2);
        assert_eq!(table.lookup("ja", "1.1"), Some("住宅地・商業地開発"));
        assert_eq!(table.lookup("ja", "1.2"), None);
    }

    #[test]
    fn test_insert_language_quoted_comma_rows() {
        let data = "1.1,\"Forest - Boreal, dry\"\n2,Savanna\n";
        let mut table = TranslationTable::new();
        table
            .insert_language("en", data.as_bytes(), TableFormat::comma(1))
            .unwrap();

        assert_eq!(table.lookup("en", "1.1"), Some("Forest - Boreal, dry"));
        assert_eq!(table.lookup("en", "2"), Some("Savanna"));
    }

    #[test]
    fn test_split_row_escaped_quote() {
        assert_eq!(
            split_row("a,\"say \"\"hi\"\"\",c", ','),
            vec!["a", "say \"hi\"", "c"]
        );
    }

    #[test]
    fn test_load_dir_uses_file_stem_as_language() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ja.csv"), "5.4.4\tx\t大規模漁業\n").unwrap();
        fs::write(dir.path().join("en.tsv"), "5.4.4\tx\tLarge scale\n").unwrap();
        fs::write(dir.path().join("README.md"), "not a table").unwrap();

        let table = TranslationTable::load_dir(dir.path(), TableFormat::TAB).unwrap();
        let mut languages: Vec<&str> = table.languages().collect();
        languages.sort();

        assert_eq!(languages, vec!["en", "ja"]);
        assert_eq!(table.lookup("ja", "5.4.4"), Some("大規模漁業"));
        assert_eq!(table.lookup("en", "5.4.4"), Some("Large scale"));
    }

    #[test]
    fn test_load_dir_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = TranslationTable::load_dir(dir.path().join("nope"), TableFormat::TAB);
        assert!(matches!(err, Err(TranslationError::Io { .. })));
    }

    #[test]
    fn test_dictionaries_route_by_domain() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("threats")).unwrap();
        fs::write(root.path().join("threats/ja.csv"), "4.1\tRoads\t道路・鉄道\n").unwrap();

        let dictionaries = Dictionaries::load(root.path(), TableFormat::TAB).unwrap();
        assert!(dictionaries.table(Domain::Habitat).is_empty());

        let threat = CodeEntry::from_value(Domain::Threat, &json!({"code": "4.1"})).unwrap();
        let habitat = CodeEntry::from_value(Domain::Habitat, &json!({"code": "4.1"})).unwrap();
        assert_eq!(dictionaries.translate(&threat, "ja"), Some("道路・鉄道"));
        assert_eq!(dictionaries.translate(&habitat, "ja"), None);
    }
}
