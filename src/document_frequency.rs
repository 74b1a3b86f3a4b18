use crate::document::{DocumentFrequency, WordOccurrence};
use crate::error::PipelineError;
use crate::group::{count_per_key, distinct};
use rayon::prelude::*;
use std::collections::HashMap;

/// Number of distinct documents in the corpus. Always at least one; an
/// empty corpus cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalDocumentCount(u64);

impl TotalDocumentCount {
    pub fn new(count: u64) -> Result<Self, PipelineError> {
        if count == 0 {
            return Err(PipelineError::EmptyCorpus);
        }
        Ok(Self(count))
    }

    /// Count distinct documents in a word stream
    pub fn count(occurrences: &[WordOccurrence]) -> Result<Self, PipelineError> {
        let documents = distinct(occurrences.par_iter().map(|o| o.document.as_str()));
        Self::new(documents.len() as u64)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// For each word, how many distinct documents contain it
pub fn word_document_counts(occurrences: &[WordOccurrence]) -> HashMap<String, u64> {
    // A word repeated inside one document counts once.
    let pairs = distinct(occurrences.par_iter());
    count_per_key(pairs.into_par_iter().map(|o| o.word.clone()))
}

fn document_frequency(word: String, count: u64, total: TotalDocumentCount) -> DocumentFrequency {
    DocumentFrequency {
        word,
        df: count as f64 / total.get() as f64,
    }
}

/// Turn per-word document counts into ratios of the corpus size
pub fn document_frequencies(
    counts: HashMap<String, u64>,
    total: TotalDocumentCount,
) -> Vec<DocumentFrequency> {
    counts
        .into_par_iter()
        .map(|(word, count)| document_frequency(word, count, total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrences(pairs: &[(&str, &str)]) -> Vec<WordOccurrence> {
        pairs
            .iter()
            .map(|(doc, word)| WordOccurrence::new(*doc, *word))
            .collect()
    }

    #[test]
    fn test_total_documents() -> Result<(), PipelineError> {
        let occ = occurrences(&[("a", "x"), ("a", "y"), ("b", "x")]);
        assert_eq!(TotalDocumentCount::count(&occ)?.get(), 2);
        Ok(())
    }

    #[test]
    fn test_empty_corpus_fails() {
        assert_eq!(TotalDocumentCount::count(&[]), Err(PipelineError::EmptyCorpus));
    }

    #[test]
    fn test_word_document_counts_deduplicates_within_document() {
        let occ = occurrences(&[("a", "the"), ("a", "the"), ("b", "the"), ("a", "cat")]);
        let counts = word_document_counts(&occ);
        assert_eq!(counts["the"], 2);
        assert_eq!(counts["cat"], 1);
    }

    #[test]
    fn test_document_frequencies_are_bounded() -> Result<(), PipelineError> {
        let occ = occurrences(&[("a", "the"), ("b", "the"), ("a", "cat")]);
        let total = TotalDocumentCount::count(&occ)?;
        let dfs = document_frequencies(word_document_counts(&occ), total);
        assert_eq!(dfs.len(), 2);
        for df in &dfs {
            assert!(df.df > 0.0 && df.df <= 1.0);
        }
        let cat = dfs.iter().find(|d| d.word == "cat").map(|d| d.df);
        assert_eq!(cat, Some(0.5));
        Ok(())
    }
}
