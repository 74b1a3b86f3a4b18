use crate::combiner::combine;
use crate::document::{DocRecord, TfIdfScore, WordOccurrence};
use crate::document_frequency::{document_frequencies, word_document_counts, TotalDocumentCount};
use crate::error::PipelineError;
use crate::group::distinct;
use crate::sink::ScoreSink;
use crate::term_frequency::term_frequencies;
use crate::tokenizer::{AnalyzerOptions, Tokenizer};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// What to do with a document whose lines contain no words
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyDocumentPolicy {
    /// Abort the run
    #[default]
    Fail,
    /// Drop the document from the corpus, including the document count
    Exclude,
}

/// Pipeline options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub empty_documents: EmptyDocumentPolicy,
    #[serde(default)]
    pub analyzer: AnalyzerOptions,
}

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub total_documents: u64,
    pub distinct_words: u64,
    pub excluded_documents: Vec<String>,
    pub scores: u64,
}

/// Scores of a run, ordered by (word, document)
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub scores: Vec<TfIdfScore>,
    pub stats: RunStats,
}

impl PipelineOutput {
    /// Deliver every score to `sink`, then finish it
    pub fn write_to<S: ScoreSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for score in &self.scores {
            sink.write(score)
                .with_context(|| format!("Failed to write score for '{}'", score.word))?;
        }
        sink.finish().context("Failed to finish sink")?;
        Ok(())
    }
}

/// Wires tokenization, both frequency stages and the final join
pub struct Pipeline {
    config: PipelineConfig,
    tokenizer: Tokenizer,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let tokenizer = Tokenizer::with_options(config.analyzer);
        Self { config, tokenizer }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Split every record into word occurrences
    pub fn tokenize(&self, records: &[DocRecord]) -> Vec<WordOccurrence> {
        records
            .par_iter()
            .flat_map_iter(|record| self.tokenizer.tokenize(record))
            .collect()
    }

    /// Documents that appear in the input but produced no words, sorted
    fn empty_documents(records: &[DocRecord], occurrences: &[WordOccurrence]) -> Vec<String> {
        let seen = distinct(records.par_iter().map(|r| r.document.as_str()));
        let with_words = distinct(occurrences.par_iter().map(|o| o.document.as_str()));

        let mut empty: Vec<String> = seen
            .difference(&with_words)
            .map(|document| document.to_string())
            .collect();
        empty.sort();
        empty
    }

    /// Compute the TF-IDF score of every (word, document) pair
    pub fn run(&self, records: &[DocRecord]) -> Result<PipelineOutput, PipelineError> {
        let occurrences = self.tokenize(records);
        tracing::debug!(
            "Tokenized {} records into {} word occurrences",
            records.len(),
            occurrences.len()
        );

        let excluded_documents = Self::empty_documents(records, &occurrences);
        if let Some(document) = excluded_documents.first() {
            match self.config.empty_documents {
                EmptyDocumentPolicy::Fail => {
                    return Err(PipelineError::EmptyDocument {
                        document: document.clone(),
                    })
                }
                EmptyDocumentPolicy::Exclude => {
                    tracing::warn!(
                        "Excluding {} documents without words",
                        excluded_documents.len()
                    );
                }
            }
        }

        // Computed once, then only read by the ratio step.
        let total = TotalDocumentCount::count(&occurrences)?;
        tracing::info!("Corpus has {} documents", total.get());

        let word_counts = word_document_counts(&occurrences);
        let distinct_words = word_counts.len() as u64;
        let dfs = document_frequencies(word_counts, total);
        let tfs = term_frequencies(&occurrences)?;
        tracing::debug!("Computed {} term frequencies over {} words", tfs.len(), distinct_words);

        let scores = combine(tfs, dfs)?;
        tracing::info!("Computed {} scores", scores.len());

        let stats = RunStats {
            total_documents: total.get(),
            distinct_words,
            excluded_documents,
            scores: scores.len() as u64,
        };
        Ok(PipelineOutput { scores, stats })
    }

    /// Run and deliver every score to `sink`
    pub fn run_into<S: ScoreSink + ?Sized>(&self, records: &[DocRecord], sink: &mut S) -> Result<RunStats> {
        let output = self.run(records)?;
        output.write_to(sink)?;
        Ok(output.stats)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
