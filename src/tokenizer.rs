use crate::document::{DocRecord, WordOccurrence};
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

lazy_static::lazy_static! {
    static ref STOPWORDS: HashSet<&'static str> = {
        [
            "a", "about", "after", "all", "am", "an", "and", "any", "are", "as", "at",
            "be", "because", "been", "before", "being", "but", "by", "can't", "could",
            "did", "do", "does", "doing", "don't", "down", "during", "each", "for", "from",
            "had", "has", "have", "having", "he", "he's", "her", "here", "hers", "him",
            "his", "how", "i", "i'm", "if", "in", "into", "is", "isn't", "it", "it's",
            "its", "me", "more", "most", "my", "no", "nor", "not", "of", "off", "on",
            "once", "only", "or", "other", "our", "out", "over", "own", "same", "she",
            "should", "so", "some", "such", "than", "that", "that's", "the", "their",
            "them", "then", "there", "these", "they", "this", "those", "through", "to",
            "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
            "where", "which", "while", "who", "whom", "why", "with", "would", "you",
            "your", "yours",
        ]
        .iter()
        .copied()
        .collect()
    };
}

/// Optional refinements applied after lowercasing. Both are off by default,
/// leaving the plain `[A-Za-z']+` word contract untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerOptions {
    #[serde(default)]
    pub remove_stopwords: bool,
    #[serde(default)]
    pub stem: bool,
}

pub struct Tokenizer {
    stemmer: Option<Stemmer>,
    remove_stopwords: bool,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '\''
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::with_options(AnalyzerOptions::default())
    }

    pub fn with_options(options: AnalyzerOptions) -> Self {
        Self {
            stemmer: options.stem.then(|| Stemmer::create(Algorithm::English)),
            remove_stopwords: options.remove_stopwords,
        }
    }

    /// Maximal runs of `[A-Za-z']`, lowercased, then filtered/stemmed as configured
    pub fn words<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        text.split(|c: char| !is_word_char(c))
            .filter(|run| !run.is_empty())
            .map(str::to_ascii_lowercase)
            .filter(move |word| !(self.remove_stopwords && STOPWORDS.contains(word.as_str())))
            .map(move |word| match &self.stemmer {
                Some(stemmer) => stemmer.stem(&word).into_owned(),
                None => word,
            })
            .filter(|word| !word.is_empty())
    }

    /// Split one record into its word occurrences. Lazy and restartable:
    /// calling it again on the same record yields the same sequence.
    pub fn tokenize<'a>(&'a self, record: &'a DocRecord) -> impl Iterator<Item = WordOccurrence> + 'a {
        self.words(&record.line)
            .map(move |word| WordOccurrence::new(record.document.as_str(), word))
    }

    /// Analyze free text (e.g. a search query) into its words
    pub fn analyze(&self, text: &str) -> Vec<String> {
        self.words(text).collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_case_folds_and_keeps_apostrophes() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.analyze("The cat's hat.");
        assert_eq!(tokens, vec!["the", "cat's", "hat"]);
    }

    #[test]
    fn test_tokenize_drops_digits_and_punctuation() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.analyze("route-66, 2nd edition; naïve");
        assert_eq!(tokens, vec!["route", "nd", "edition", "na", "ve"]);
    }

    #[test]
    fn test_tokenize_record_carries_document() {
        let tokenizer = Tokenizer::new();
        let record = DocRecord::new("a.txt", "Hello hello");
        let occurrences: Vec<_> = tokenizer.tokenize(&record).collect();
        assert_eq!(
            occurrences,
            vec![
                WordOccurrence::new("a.txt", "hello"),
                WordOccurrence::new("a.txt", "hello"),
            ]
        );
        // Restartable
        assert_eq!(tokenizer.tokenize(&record).count(), 2);
    }

    #[test]
    fn test_tokenize_empty_match_line() {
        let tokenizer = Tokenizer::new();
        let record = DocRecord::new("a.txt", "1234 -- !!");
        assert_eq!(tokenizer.tokenize(&record).count(), 0);
    }

    #[test]
    fn test_analyze_with_stopwords_and_stemming() {
        let tokenizer = Tokenizer::with_options(AnalyzerOptions {
            remove_stopwords: true,
            stem: true,
        });
        let tokens = tokenizer.analyze("The quick foxes were jumping");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"were".to_string()));
        assert!(tokens.contains(&"quick".to_string()));
        assert!(tokens.contains(&"jump".to_string()));
    }
}
