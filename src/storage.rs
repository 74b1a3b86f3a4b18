use crate::document::TfIdfScore;
use crate::pipeline::RunStats;
use crate::sink::ScoreSink;
use crate::tokenizer::AnalyzerOptions;
use anyhow::{Context, Result};
use sled::{Db, Tree};
use std::path::Path;

const SCORES_TREE: &str = "scores";
const DOCUMENTS_TREE: &str = "documents";
const METADATA_TREE: &str = "metadata";

const RUN_STATS_KEY: &[u8] = b"run_stats";
const ANALYZER_KEY: &[u8] = b"analyzer";

/// Persistent scores of one run, readable by word and by document
pub struct ScoreStore {
    db: Db,
}

/// `first \0 second`. Words never contain NUL and neither do file paths.
fn composite_key(first: &str, second: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(first.len() + second.len() + 1);
    key.extend_from_slice(first.as_bytes());
    key.push(0);
    key.extend_from_slice(second.as_bytes());
    key
}

fn prefix(first: &str) -> Vec<u8> {
    let mut key = first.as_bytes().to_vec();
    key.push(0);
    key
}

fn split_key(key: &[u8]) -> Result<(String, String)> {
    let pos = key
        .iter()
        .position(|b| *b == 0)
        .context("Malformed score key")?;
    let first = std::str::from_utf8(&key[..pos])?.to_string();
    let second = std::str::from_utf8(&key[pos + 1..])?.to_string();
    Ok((first, second))
}

/// Highest score first, ties by name
fn sort_descending(scores: &mut [TfIdfScore]) {
    scores.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.document.cmp(&b.document))
            .then_with(|| a.word.cmp(&b.word))
    });
}

impl ScoreStore {
    /// Open or create a score database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path).context("Failed to open score database")?;
        Ok(Self { db })
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let config = sled::Config::new().temporary(true);
        let db = config.open().context("Failed to create in-memory database")?;
        Ok(Self { db })
    }

    fn tree(&self, name: &str) -> Result<Tree> {
        self.db
            .open_tree(name)
            .with_context(|| format!("Failed to open tree '{}'", name))
    }

    // ========== Score Operations ==========

    /// Save a score. Saving the same (word, document) again overwrites it.
    pub fn save_score(&self, score: &TfIdfScore) -> Result<()> {
        let value = bincode::serialize(&score.score)?;
        self.tree(SCORES_TREE)?
            .insert(composite_key(&score.word, &score.document), value.clone())?;
        self.tree(DOCUMENTS_TREE)?
            .insert(composite_key(&score.document, &score.word), value)?;
        Ok(())
    }

    fn scan(&self, tree: &str, first: &str) -> Result<Vec<(String, String, f64)>> {
        let mut entries = Vec::new();
        for item in self.tree(tree)?.scan_prefix(prefix(first)) {
            let (key, value) = item?;
            let (first, second) = split_key(&key)?;
            let score: f64 = bincode::deserialize(&value)?;
            entries.push((first, second, score));
        }
        Ok(entries)
    }

    /// Scores of a word in every document containing it, highest first
    pub fn scores_for_word(&self, word: &str) -> Result<Vec<TfIdfScore>> {
        let mut scores: Vec<TfIdfScore> = self
            .scan(SCORES_TREE, word)?
            .into_iter()
            .map(|(word, document, score)| TfIdfScore { word, document, score })
            .collect();
        sort_descending(&mut scores);
        Ok(scores)
    }

    /// Scores of every word in a document, highest first
    pub fn scores_for_document(&self, document: &str) -> Result<Vec<TfIdfScore>> {
        let mut scores: Vec<TfIdfScore> = self
            .scan(DOCUMENTS_TREE, document)?
            .into_iter()
            .map(|(document, word, score)| TfIdfScore { word, document, score })
            .collect();
        sort_descending(&mut scores);
        Ok(scores)
    }

    /// Count stored scores
    pub fn count_scores(&self) -> Result<usize> {
        Ok(self.tree(SCORES_TREE)?.len())
    }

    // ========== Metadata Operations ==========

    pub fn save_run_stats(&self, stats: &RunStats) -> Result<()> {
        let tree = self.tree(METADATA_TREE)?;
        tree.insert(RUN_STATS_KEY, bincode::serialize(stats)?)?;
        Ok(())
    }

    pub fn run_stats(&self) -> Result<Option<RunStats>> {
        let tree = self.tree(METADATA_TREE)?;
        match tree.get(RUN_STATS_KEY)? {
            Some(data) => Ok(Some(bincode::deserialize(&data)?)),
            None => Ok(None),
        }
    }

    /// Analyzer options the stored scores were computed with, so queries
    /// can be tokenized the same way
    pub fn save_analyzer(&self, options: &AnalyzerOptions) -> Result<()> {
        let tree = self.tree(METADATA_TREE)?;
        tree.insert(ANALYZER_KEY, bincode::serialize(options)?)?;
        Ok(())
    }

    pub fn analyzer(&self) -> Result<Option<AnalyzerOptions>> {
        let tree = self.tree(METADATA_TREE)?;
        match tree.get(ANALYZER_KEY)? {
            Some(data) => Ok(Some(bincode::deserialize(&data)?)),
            None => Ok(None),
        }
    }

    /// Flush all changes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Clear all data
    pub fn clear(&self) -> Result<()> {
        self.db.drop_tree(SCORES_TREE)?;
        self.db.drop_tree(DOCUMENTS_TREE)?;
        self.db.drop_tree(METADATA_TREE)?;
        Ok(())
    }
}

impl ScoreSink for ScoreStore {
    fn write(&mut self, score: &TfIdfScore) -> Result<()> {
        self.save_score(score)
    }

    fn finish(&mut self) -> Result<()> {
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_by_word_and_document() -> Result<()> {
        let store = ScoreStore::in_memory()?;
        store.save_score(&TfIdfScore::new("cat", "a", 0.1))?;
        store.save_score(&TfIdfScore::new("cat", "b", 0.3))?;
        store.save_score(&TfIdfScore::new("cats", "a", 0.9))?;

        let cat = store.scores_for_word("cat")?;
        assert_eq!(cat.len(), 2);
        assert_eq!(cat[0].document, "b");

        let doc_a = store.scores_for_document("a")?;
        assert_eq!(doc_a.len(), 2);
        assert_eq!(doc_a[0].word, "cats");
        Ok(())
    }

    #[test]
    fn test_save_is_idempotent_overwrite() -> Result<()> {
        let store = ScoreStore::in_memory()?;
        let score = TfIdfScore::new("cat", "a", 0.1);
        store.save_score(&score)?;
        store.save_score(&score)?;
        assert_eq!(store.count_scores()?, 1);
        assert_eq!(store.scores_for_word("cat")?, vec![score]);
        Ok(())
    }

    #[test]
    fn test_run_stats_and_clear() -> Result<()> {
        let store = ScoreStore::in_memory()?;
        assert!(store.run_stats()?.is_none());

        let stats = RunStats {
            total_documents: 2,
            distinct_words: 4,
            excluded_documents: vec![],
            scores: 6,
        };
        store.save_run_stats(&stats)?;
        store.save_score(&TfIdfScore::new("cat", "a", 0.1))?;
        assert_eq!(store.run_stats()?, Some(stats));

        store.clear()?;
        assert!(store.run_stats()?.is_none());
        assert_eq!(store.count_scores()?, 0);
        Ok(())
    }

    #[test]
    fn test_reopen_from_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("scores.db");
        {
            let mut store = ScoreStore::open(&path)?;
            store.write(&TfIdfScore::new("dog", "b", 0.7))?;
            store.save_analyzer(&AnalyzerOptions {
                remove_stopwords: true,
                stem: false,
            })?;
            store.finish()?;
        }
        let store = ScoreStore::open(&path)?;
        assert_eq!(store.scores_for_document("b")?.len(), 1);
        assert_eq!(store.analyzer()?.map(|a| a.remove_stopwords), Some(true));
        Ok(())
    }
}
