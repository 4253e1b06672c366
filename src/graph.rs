//! Word graph store.
//!
//! The dataset is a CSV table with `word`, `hint` and `neighbors` columns, the
//! last one holding `;` separated word keys. Entries live in an arena and are
//! addressed by index; neighbors are kept as keys, so dangling references are
//! allowed and simply resolve to nothing.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::DataFormatError;
use crate::{debug_log, info_log};

pub const EMBEDDED_DATASET: &str = include_str!("resources/words.csv");

const WORD_COLUMN: &str = "word";
const HINT_COLUMN: &str = "hint";
const NEIGHBORS_COLUMN: &str = "neighbors";
const NEIGHBOR_SEPARATOR: char = ';';

/// One row of the dataset after normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordEntry {
    pub word: String,
    pub hint: String,
    pub neighbors: Vec<String>,
}

/// Read-only adjacency structure built once at startup.
#[derive(Clone, Debug, Default)]
pub struct WordGraph {
    entries: Vec<WordEntry>,
    index: HashMap<String, usize>,
}

/// Keys are compared case-folded and trimmed everywhere.
pub fn normalize_key(word: &str) -> String {
    word.trim().to_lowercase()
}

fn parse_neighbors(field: &str) -> Vec<String> {
    field
        .split(NEIGHBOR_SEPARATOR)
        .map(normalize_key)
        .filter(|token| !token.is_empty())
        .collect()
}

impl WordGraph {
    /// Build a graph from any CSV source.
    ///
    /// Fails if a required column is absent from the header or a record is too
    /// short to carry one of them. A repeated word key replaces the earlier entry.
    pub fn load<R: Read>(source: R) -> Result<Self, DataFormatError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(source);

        let headers = reader.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(DataFormatError::MissingColumn(name))
        };
        let word_col = column(WORD_COLUMN)?;
        let hint_col = column(HINT_COLUMN)?;
        let neighbors_col = column(NEIGHBORS_COLUMN)?;

        let mut graph = Self::default();
        for (i, result) in reader.records().enumerate() {
            let record = result?;
            let field = |idx: usize, name: &'static str| {
                record
                    .get(idx)
                    .ok_or(DataFormatError::MissingField { record: i + 1, field: name })
            };

            let word = normalize_key(field(word_col, WORD_COLUMN)?);
            let hint = field(hint_col, HINT_COLUMN)?.trim().to_string();
            let neighbors = parse_neighbors(field(neighbors_col, NEIGHBORS_COLUMN)?);

            if word.is_empty() {
                log::warn!("Skipping record {} with an empty word", i + 1);
                continue;
            }
            graph.insert(WordEntry { word, hint, neighbors });
        }

        info_log!("Loaded word graph with {} entries", graph.len());
        Ok(graph)
    }

    pub fn load_from_str(data: &str) -> Result<Self, DataFormatError> {
        Self::load(data.as_bytes())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, DataFormatError> {
        let file = File::open(path)?;
        Self::load(BufReader::new(file))
    }

    /// The dataset compiled into the binary.
    pub fn embedded() -> Result<Self, DataFormatError> {
        Self::load_from_str(EMBEDDED_DATASET)
    }

    fn insert(&mut self, entry: WordEntry) {
        match self.index.get(&entry.word) {
            Some(&idx) => {
                log::warn!("Duplicate word '{}' in dataset, keeping the later record", entry.word);
                self.entries[idx] = entry;
            }
            None => {
                debug_log!("Adding '{}' with {} neighbors", entry.word, entry.neighbors.len());
                self.index.insert(entry.word.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn lookup(&self, word: &str) -> Option<&WordEntry> {
        self.index.get(&normalize_key(word)).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup(word).is_some()
    }

    /// Neighbor keys of `word`, empty for words outside the graph.
    pub fn neighbors(&self, word: &str) -> &[String] {
        self.lookup(word)
            .map(|entry| entry.neighbors.as_slice())
            .unwrap_or_default()
    }

    /// All keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.word.as_str())
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

    const SAMPLE: &str = "word,hint,neighbors\n\
        cat,A cat is a pet.,dog\n\
        dog,A dog barks.,cat\n";

    #[test]
    fn test_load_basic_graph() {
        let graph = WordGraph::load_from_str(SAMPLE).unwrap();
        assert_eq!(graph.len(), 2);
        let cat = graph.lookup("cat").unwrap();
        assert_eq!(cat.hint, "A cat is a pet.");
        assert_eq!(cat.neighbors, vec!["dog".to_string()]);
    }

    #[test]
    fn test_keys_and_neighbors_are_normalized() {
        let data = "word,hint,neighbors\n  Apple ,  A red fruit.  , Pear ; ;BANANA;;kiwi \n";
        let graph = WordGraph::load_from_str(data).unwrap();
        let apple = graph.lookup("apple").unwrap();
        assert_eq!(apple.word, "apple");
        assert_eq!(apple.hint, "A red fruit.");
        assert_eq!(apple.neighbors, vec!["pear", "banana", "kiwi"]);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let graph = WordGraph::load_from_str(SAMPLE).unwrap();
        assert!(graph.lookup("CAT").is_some());
        assert!(graph.lookup("  Dog ").is_some());
        assert!(graph.lookup("bird").is_none());
    }

    #[test]
    fn test_quoted_hint_with_commas() {
        let data = "word,hint,neighbors\nlemon,\"Sour, yellow, and bright.\",lime;orange\n";
        let graph = WordGraph::load_from_str(data).unwrap();
        assert_eq!(graph.lookup("lemon").unwrap().hint, "Sour, yellow, and bright.");
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let data = "neighbors,difficulty,hint,word\nbird,1,Says meow.,cat\n";
        let graph = WordGraph::load_from_str(data).unwrap();
        let cat = graph.lookup("cat").unwrap();
        assert_eq!(cat.hint, "Says meow.");
        assert_eq!(cat.neighbors, vec!["bird"]);
    }

    #[test]
    fn test_missing_column_fails() {
        let data = "word,hint\ncat,A pet.\n";
        match WordGraph::load_from_str(data) {
            Err(DataFormatError::MissingColumn(name)) => assert_eq!(name, "neighbors"),
            other => panic!("Expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_short_record_fails() {
        let data = "word,hint,neighbors\ncat,A pet.,dog\ndog,Barks.\n";
        match WordGraph::load_from_str(data) {
            Err(DataFormatError::MissingField { record, field }) => {
                assert_eq!(record, 2);
                assert_eq!(field, "neighbors");
            }
            other => panic!("Expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_key_last_write_wins() {
        let data = "word,hint,neighbors\ncat,First.,dog\nCat,Second.,bird\n";
        let graph = WordGraph::load_from_str(data).unwrap();
        assert_eq!(graph.len(), 1);
        let cat = graph.lookup("cat").unwrap();
        assert_eq!(cat.hint, "Second.");
        assert_eq!(cat.neighbors, vec!["bird"]);
    }

    #[test]
    fn test_dangling_neighbors_are_kept() {
        let data = "word,hint,neighbors\ncat,A pet.,unicorn\n";
        let graph = WordGraph::load_from_str(data).unwrap();
        assert_eq!(graph.neighbors("cat"), ["unicorn".to_string()]);
        assert!(graph.neighbors("unicorn").is_empty());
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let data = "word,hint,neighbors\nzebra,Stripes.,\napple,Fruit.,\nmango,Fruit.,\n";
        let graph = WordGraph::load_from_str(data).unwrap();
        let keys: Vec<&str> = graph.keys().collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_empty_dataset() {
        let graph = WordGraph::load_from_str("word,hint,neighbors\n").unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = WordGraph::load_from_file("/nonexistent/words.csv");
        assert!(matches!(result, Err(DataFormatError::Io(_))));
    }

    #[test]
    fn test_embedded_dataset_loads() {
        let graph = WordGraph::embedded().unwrap();
        assert!(graph.len() >= 40);
        assert!(graph.keys().all(|k| k == k.trim().to_lowercase()));
    }
}
