use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::EngineError;

/// Words excluded from indexing and from query term weighting.
///
/// Loaded from a newline-separated flat file. A load failure is a
/// `Config` error and leaves the previous configuration untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopWordSet {
    words: HashSet<String>,
}

impl StopWordSet {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("error opening {}: {e}", path.display())))?;
        Ok(Self::from_words(text.lines().map(str::trim).filter(|l| !l.is_empty())))
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { words: words.into_iter().map(Into::into).collect() }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Word to ordered alternatives, used only for query expansion.
///
/// Loaded from a comma-separated flat file, one row per word:
/// `word,alternative1,alternative2,...`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thesaurus {
    entries: HashMap<String, Vec<String>>,
}

impl Thesaurus {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("error opening {}: {e}", path.display())))?;
        Self::parse(&text).map_err(|reason| {
            EngineError::Config(format!("error parsing {}: {reason}", path.display()))
        })
    }

    fn parse(text: &str) -> Result<Self, String> {
        let mut entries = HashMap::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split(',').map(str::trim);
            let word = fields.next().unwrap_or_default();
            if word.is_empty() {
                return Err(format!("line {}: row has no head word", lineno + 1));
            }
            let alternatives: Vec<String> =
                fields.filter(|a| !a.is_empty()).map(str::to_string).collect();
            entries.insert(word.to_string(), alternatives);
        }
        Ok(Self { entries })
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(w, alts)| (w.into(), alts.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    pub fn alternatives(&self, word: &str) -> Option<&[String]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_thesaurus_rows() {
        let t = Thesaurus::parse("car,automobile,vehicle\nfast,quick\n").unwrap();
        assert_eq!(
            t.alternatives("car").unwrap(),
            &["automobile".to_string(), "vehicle".to_string()]
        );
        assert_eq!(t.alternatives("fast").unwrap(), &["quick".to_string()]);
        assert!(t.alternatives("slow").is_none());
    }

    #[test]
    fn rejects_row_without_head_word() {
        assert!(Thesaurus::parse("car,automobile\n,orphan\n").is_err());
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = StopWordSet::load(Path::new("/nonexistent/stopwords.txt")).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        let err = Thesaurus::load(Path::new("/nonexistent/thesaurus.csv")).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
