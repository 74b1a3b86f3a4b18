use crate::document::{TermFrequency, WordOccurrence};
use crate::error::PipelineError;
use crate::group::{cogroup, count_per_key, CoGroup};
use rayon::prelude::*;
use std::collections::HashMap;

/// Total words per document, repeats included
pub fn document_totals(occurrences: &[WordOccurrence]) -> HashMap<String, u64> {
    count_per_key(occurrences.par_iter().map(|o| o.document.clone()))
}

/// How often each word occurs in each document
pub fn occurrence_counts(occurrences: &[WordOccurrence]) -> HashMap<WordOccurrence, u64> {
    count_per_key(occurrences.par_iter().cloned())
}

/// A word's count inside one document, keyed by that document
#[derive(Debug, Clone)]
struct WordCount {
    word: String,
    count: u64,
}

/// Divide every word count of a document by that document's total
fn document_term_frequencies(
    document: String,
    group: CoGroup<u64, WordCount>,
) -> Result<Vec<TermFrequency>, PipelineError> {
    let total = match group.left.as_slice() {
        [total] => *total,
        [] => return Err(PipelineError::MissingDocumentTotal { document }),
        totals => {
            return Err(PipelineError::DuplicateKey {
                key: document,
                count: totals.len(),
            })
        }
    };
    if total == 0 {
        return Err(PipelineError::EmptyDocument { document });
    }

    Ok(group
        .right
        .into_iter()
        .map(|wc| TermFrequency {
            word: wc.word,
            document: document.clone(),
            tf: wc.count as f64 / total as f64,
        })
        .collect())
}

/// Term frequency of every (word, document) pair in the stream
pub fn term_frequencies(occurrences: &[WordOccurrence]) -> Result<Vec<TermFrequency>, PipelineError> {
    let totals = document_totals(occurrences);
    let counts = occurrence_counts(occurrences);

    let by_document = counts.into_iter().map(|(occurrence, count)| {
        (
            occurrence.document,
            WordCount {
                word: occurrence.word,
                count,
            },
        )
    });
    let groups = cogroup(totals, by_document);

    let per_document: Vec<Vec<TermFrequency>> = groups
        .into_par_iter()
        .map(|(document, group)| document_term_frequencies(document, group))
        .collect::<Result<_, _>>()?;

    Ok(per_document.into_iter().flatten().collect())
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
    fn test_document_totals_count_repeats() {
        let occ = occurrences(&[("a", "x"), ("a", "x"), ("a", "y"), ("b", "z")]);
        let totals = document_totals(&occ);
        assert_eq!(totals["a"], 3);
        assert_eq!(totals["b"], 1);
    }

    #[test]
    fn test_word_counts_sum_to_document_total() {
        let occ = occurrences(&[("a", "x"), ("a", "x"), ("a", "y"), ("b", "z"), ("b", "x")]);
        let totals = document_totals(&occ);
        let counts = occurrence_counts(&occ);
        for (document, total) in &totals {
            let sum: u64 = counts
                .iter()
                .filter(|(o, _)| &o.document == document)
                .map(|(_, c)| c)
                .sum();
            assert_eq!(sum, *total);
        }
    }

    #[test]
    fn test_term_frequencies() -> Result<(), PipelineError> {
        let occ = occurrences(&[("a", "the"), ("a", "cat"), ("a", "the"), ("a", "sat")]);
        let mut tfs = term_frequencies(&occ)?;
        tfs.sort_by(|x, y| x.word.cmp(&y.word));
        let words: Vec<_> = tfs.iter().map(|t| (t.word.as_str(), t.tf)).collect();
        assert_eq!(words, vec![("cat", 0.25), ("sat", 0.25), ("the", 0.5)]);
        Ok(())
    }

    #[test]
    fn test_missing_total_is_an_integrity_error() {
        let group = CoGroup {
            left: vec![],
            right: vec![WordCount {
                word: "x".to_string(),
                count: 1,
            }],
        };
        let err = document_term_frequencies("a".to_string(), group).unwrap_err();
        assert_eq!(
            err,
            PipelineError::MissingDocumentTotal {
                document: "a".to_string()
            }
        );
    }

    #[test]
    fn test_zero_total_is_an_empty_document() {
        let group = CoGroup {
            left: vec![0],
            right: vec![],
        };
        let err = document_term_frequencies("a".to_string(), group).unwrap_err();
        assert_eq!(
            err,
            PipelineError::EmptyDocument {
                document: "a".to_string()
            }
        );
    }
}
