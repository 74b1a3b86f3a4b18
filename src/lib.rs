// Re-export main components
pub mod api;
pub mod combiner;
pub mod document;
pub mod document_frequency;
pub mod error;
pub mod group;
pub mod loader;
pub mod pipeline;
pub mod ranking;
pub mod sink;
pub mod storage;
pub mod term_frequency;
pub mod tokenizer;

// Re-export commonly used types
pub use document::{DocRecord, DocumentFrequency, TermFrequency, TfIdfScore, WordOccurrence};
pub use error::PipelineError;
pub use pipeline::{EmptyDocumentPolicy, Pipeline, PipelineConfig, PipelineOutput, RunStats};
pub use sink::ScoreSink;
pub use storage::ScoreStore;
pub use tokenizer::Tokenizer;

// Re-export error types
pub use anyhow::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
