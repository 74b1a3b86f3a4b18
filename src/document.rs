use serde::{Deserialize, Serialize};

/// One raw line of a source document, as handed over by the loader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    pub document: String,
    pub line: String,
}

impl DocRecord {
    pub fn new(document: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            line: line.into(),
        }
    }
}

/// A single word seen in a document. Repeats are kept as separate values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordOccurrence {
    pub document: String,
    pub word: String,
}

impl WordOccurrence {
    pub fn new(document: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            word: word.into(),
        }
    }
}

/// Share of a document's words that are `word`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermFrequency {
    pub word: String,
    pub document: String,
    pub tf: f64,
}

/// Share of the corpus's documents that contain `word`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentFrequency {
    pub word: String,
    pub df: f64,
}

/// Final relevance weight of a word for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfScore {
    pub word: String,
    pub document: String,
    pub score: f64,
}

impl TfIdfScore {
    pub fn new(word: impl Into<String>, document: impl Into<String>, score: f64) -> Self {
        Self {
            word: word.into(),
            document: document.into(),
            score,
        }
    }
}
