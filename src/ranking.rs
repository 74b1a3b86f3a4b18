use crate::storage::ScoreStore;
use anyhow::Result;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Ranked search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub document: String,
    pub score: f64,
}

impl ScoredDocument {
    pub fn new(document: String, score: f64) -> Self {
        Self { document, score }
    }
}

/// Rank documents by the sum of the stored TF-IDF scores of the query terms
/// they contain. Repeated query terms count once.
pub fn rank_documents(query_terms: &[String], store: &ScoreStore) -> Result<Vec<ScoredDocument>> {
    // Sorted so the floating point sums are added in the same order every time
    let terms: BTreeSet<&str> = query_terms.iter().map(String::as_str).collect();

    let mut totals: HashMap<String, f64> = HashMap::new();
    for term in terms {
        for score in store.scores_for_word(term)? {
            *totals.entry(score.document).or_insert(0.0) += score.score;
        }
    }

    let mut scored_docs: Vec<ScoredDocument> = totals
        .into_iter()
        .map(|(document, score)| ScoredDocument::new(document, score))
        .collect();

    // Sort by score descending
    scored_docs.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.document.cmp(&b.document))
    });

    Ok(scored_docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TfIdfScore;

    fn store() -> Result<ScoreStore> {
        let store = ScoreStore::in_memory()?;
        store.save_score(&TfIdfScore::new("cat", "a", 0.2))?;
        store.save_score(&TfIdfScore::new("hat", "a", 0.1))?;
        store.save_score(&TfIdfScore::new("cat", "b", 0.25))?;
        store.save_score(&TfIdfScore::new("dog", "c", 0.5))?;
        Ok(store)
    }

    #[test]
    fn test_rank_documents_sums_terms() -> Result<()> {
        let store = store()?;
        let ranked = rank_documents(&["cat".to_string(), "hat".to_string()], &store)?;
        let order: Vec<_> = ranked.iter().map(|d| d.document.as_str()).collect();
        assert_eq!(order, vec!["a", "b"]);
        assert!((ranked[0].score - 0.3).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn test_repeated_terms_count_once() -> Result<()> {
        let store = store()?;
        let once = rank_documents(&["dog".to_string()], &store)?;
        let twice = rank_documents(&["dog".to_string(), "dog".to_string()], &store)?;
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn test_unknown_terms_rank_nothing() -> Result<()> {
        let store = store()?;
        assert!(rank_documents(&["zebra".to_string()], &store)?.is_empty());
        Ok(())
    }
}
