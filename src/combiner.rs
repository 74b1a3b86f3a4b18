use crate::document::{DocumentFrequency, TermFrequency, TfIdfScore};
use crate::error::PipelineError;
use crate::group::{cogroup, CoGroup};
use rayon::prelude::*;

/// A term frequency once its word has been pulled out as the join key
#[derive(Debug, Clone)]
struct DocumentTf {
    document: String,
    tf: f64,
}

/// tf × log(1 / df)
pub fn tf_idf(tf: f64, df: f64) -> f64 {
    tf * (1.0 / df).ln()
}

/// Score every document under one word against that word's single
/// document frequency
fn score_word(word: String, group: CoGroup<DocumentTf, f64>) -> Result<Vec<TfIdfScore>, PipelineError> {
    if group.left.is_empty() {
        // Nothing to score; a df without tf values emits nothing.
        return Ok(Vec::new());
    }
    let df = match group.right.as_slice() {
        [df] => *df,
        [] => return Err(PipelineError::OrphanWord { word }),
        dfs => {
            return Err(PipelineError::DuplicateKey {
                key: word,
                count: dfs.len(),
            })
        }
    };

    Ok(group
        .left
        .into_iter()
        .map(|entry| TfIdfScore {
            word: word.clone(),
            document: entry.document,
            score: tf_idf(entry.tf, df),
        })
        .collect())
}

/// Join term frequencies with document frequencies by word and compute
/// the final scores, ordered by (word, document).
pub fn combine(
    term_frequencies: Vec<TermFrequency>,
    document_frequencies: Vec<DocumentFrequency>,
) -> Result<Vec<TfIdfScore>, PipelineError> {
    let tf_by_word = term_frequencies.into_iter().map(|t| {
        (
            t.word,
            DocumentTf {
                document: t.document,
                tf: t.tf,
            },
        )
    });
    let df_by_word = document_frequencies.into_iter().map(|d| (d.word, d.df));
    let groups = cogroup(tf_by_word, df_by_word);

    let per_word: Vec<Vec<TfIdfScore>> = groups
        .into_par_iter()
        .map(|(word, group)| score_word(word, group))
        .collect::<Result<_, _>>()?;

    let mut scores: Vec<TfIdfScore> = per_word.into_iter().flatten().collect();
    scores.par_sort_unstable_by(|a, b| a.word.cmp(&b.word).then_with(|| a.document.cmp(&b.document)));
    Ok(scores)
}
