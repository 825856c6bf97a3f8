//! Engine errors
//!
//! Hashing and enumeration cannot fail; everything here is either a
//! configuration problem caught before the search starts or a worker thread
//! that died.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Alphabet must contain at least one symbol")]
    EmptyAlphabet,

    #[error("Alphabet contains '{0}' more than once")]
    DuplicateSymbol(char),

    #[error("Alphabet symbol {0:?} is not printable ASCII")]
    InvalidSymbol(char),

    #[error("Minimum candidate length must be at least 1")]
    ZeroLength,

    #[error("Minimum length {min} is greater than maximum length {max}")]
    InvalidLengthRange { min: usize, max: usize },

    #[error(
        "{alphabet}^{length} candidates do not fit in 128 bits; maximum length for this alphabet is {limit}"
    )]
    SpaceOverflow {
        alphabet: usize,
        length: usize,
        limit: usize,
    },

    #[error("Invalid selector '{0}': expected 8 hex digits")]
    InvalidSelector(String),

    #[error("Worker count must be at least 1")]
    NoWorkers,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(String),

    #[error("Worker {0} panicked")]
    WorkerPanicked(usize),
}

pub type Result<T> = core::result::Result<T, SearchError>;
