// Error types shared by the detector core and the rule configuration loader

use std::path::PathBuf;
use thiserror::Error;

/// Caller contract violations reported by [`crate::SentenceDetector::split`]
///
/// Both variants carry the index of the offending token in the input slice
/// together with its offsets, so callers can point at the bad annotation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// Token offsets fall outside the text, or `end` precedes `start`
    #[error("token {index} has offsets {start}..{end} outside text of length {text_len}")]
    OutOfRangeOffset {
        index: usize,
        start: usize,
        end: usize,
        text_len: usize,
    },

    /// Token start offset is smaller than its predecessor's
    #[error("token {index} starts at {start}, before the previous token start {previous_start}")]
    UnorderedTokens {
        index: usize,
        start: usize,
        previous_start: usize,
    },
}

impl SplitError {
    /// Index of the token that violated the contract
    pub fn token_index(&self) -> usize {
        match self {
            SplitError::OutOfRangeOffset { index, .. } => *index,
            SplitError::UnorderedTokens { index, .. } => *index,
        }
    }
}

/// Failures while loading a TOML rule file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid rule entry: {0}")]
    Invalid(String),
}
