//! Error types shared across the word graph, the selector and the round engine.

use thiserror::Error;

/// The dataset could not be turned into a word graph.
///
/// Always fatal: a graph is never partially loaded.
#[derive(Debug, Error)]
pub enum DataFormatError {
    /// The header row lacks one of `word`, `hint`, `neighbors`.
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// A record is too short to hold a required field.
    #[error("record {record} is missing field '{field}'")]
    MissingField {
        /// 1-based record number, header excluded.
        record: usize,
        field: &'static str,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
}

/// Word search came back empty-handed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no unused candidate found after {attempts} attempts")]
    NoCandidateFound { attempts: usize },
}

/// A guess was rejected without touching the round.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuessError {
    #[error("please enter a guess")]
    InvalidGuess,
}
