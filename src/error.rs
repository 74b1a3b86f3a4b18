use thiserror::Error;

/// Structural failures of a scoring run. None of these are recoverable
/// mid-pipeline; they abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// No document produced a single word, so every document frequency
    /// would divide by zero.
    #[error("corpus is empty: no documents contain any words")]
    EmptyCorpus,

    /// A document was seen by the loader but tokenized to nothing.
    #[error("document '{document}' contains no words")]
    EmptyDocument { document: String },

    /// A term-frequency word with no document-frequency counterpart.
    #[error("word '{word}' has a term frequency but no document frequency")]
    OrphanWord { word: String },

    /// A (document, word) count with no per-document word total.
    #[error("document '{document}' has word counts but no word total")]
    MissingDocumentTotal { document: String },

    /// A key that must map to exactly one value on one side of a join
    /// mapped to several.
    #[error("key '{key}' has {count} values where exactly one was expected")]
    DuplicateKey { key: String, count: usize },
}
