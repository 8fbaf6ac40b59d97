pub mod config;
pub mod error;
pub mod lif;
pub mod sentence_detector;
pub mod service;
pub mod tokenizer;

// Re-export main types for convenient access
pub use error::{ConfigError, SplitError};
pub use sentence_detector::{
    SentenceBoundaryRules,
    SentenceDetector,
    SentenceSpan,
    Token,
};

// Re-export the LIF adapter
pub use service::{ServiceError, SplitterService};
pub use tokenizer::Tokenizer;
