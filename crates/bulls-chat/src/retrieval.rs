//! Passage retrieval by term-vector similarity.
//!
//! Each passage is reduced to a term-frequency vector over lowercase word
//! tokens with stop words removed. A query is scored against every passage
//! by cosine similarity; candidates below `min_relevance` are discarded.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use bulls_core::Answer;

use crate::classifier::{Classification, Classifier};
use crate::knowledge::Passage;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9]+").expect("Invalid token regex"));

static STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "am", "be", "been", "being",
    "have", "has", "had", "do", "does", "did", "will", "would", "shall", "should",
    "may", "might", "must", "can", "could", "i", "me", "my", "we", "our", "you",
    "your", "he", "she", "it", "they", "them", "his", "her", "its", "their",
    "what", "which", "who", "whom", "this", "that", "these", "those", "of", "in",
    "to", "for", "with", "on", "at", "from", "by", "about", "as", "into", "through",
    "and", "but", "or", "not", "no", "so", "if", "then", "than", "too", "very",
    "just", "also", "up", "out", "all", "any", "some", "how", "when", "where", "why",
    "tell", "show", "please", "s",
];

type TermVector = HashMap<String, f64>;

/// Split text into lowercase content tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| t.len() >= 2 && !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

fn term_vector(text: &str) -> TermVector {
    let mut tf = TermVector::new();
    for token in tokenize(text) {
        *tf.entry(token).or_insert(0.0) += 1.0;
    }
    tf
}

fn norm(v: &TermVector) -> f64 {
    v.values().map(|x| x * x).sum::<f64>().sqrt()
}

struct IndexedPassage {
    passage: Passage,
    terms: TermVector,
    norm: f64,
}

/// Ranks knowledge-base passages against a query.
pub struct PassageRetriever {
    passages: Vec<IndexedPassage>,
    min_relevance: f64,
    top_k: usize,
}

impl PassageRetriever {
    /// Index `passages` for retrieval.
    ///
    /// `top_k` is raised to at least 1.
    pub fn new(passages: Vec<Passage>, min_relevance: f64, top_k: usize) -> Self {
        let passages = passages
            .into_iter()
            .map(|passage| {
                let terms = term_vector(&passage.text);
                let norm = norm(&terms);
                IndexedPassage {
                    passage,
                    terms,
                    norm,
                }
            })
            .collect();
        Self {
            passages,
            min_relevance: min_relevance.clamp(0.0, 1.0),
            top_k: top_k.max(1),
        }
    }

    /// Score every passage and return those clearing the relevance bar, best first.
    pub fn retrieve(&self, text: &str) -> Vec<(&Passage, f64)> {
        let query = term_vector(text);
        let query_norm = norm(&query);
        if query_norm == 0.0 {
            return Vec::new();
        }

        let mut scored: Vec<(&Passage, f64)> = self
            .passages
            .iter()
            .filter(|p| p.norm > 0.0)
            .map(|p| {
                let dot: f64 = query
                    .iter()
                    .filter_map(|(term, q)| p.terms.get(term).map(|d| q * d))
                    .sum();
                (&p.passage, dot / (query_norm * p.norm))
            })
            .filter(|(_, score)| *score >= self.min_relevance && *score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(self.top_k);
        scored
    }
}

impl Classifier for PassageRetriever {
    fn name(&self) -> &'static str {
        "retrieval"
    }

    fn classify(&self, text: &str) -> Classification {
        let ranked = self.retrieve(text);
        let Some(&(best, score)) = ranked.first() else {
            return Classification::NoConfidentMatch;
        };
        tracing::debug!(
            best = %best.id,
            score,
            candidates = ranked.len(),
            "Passage retrieved"
        );
        let sources = ranked.iter().map(|(p, _)| p.id.clone()).collect();
        Classification::Matched(Answer::ranked(best.text.clone(), sources, score))
    }
}

// =============================================================================
// Tests
// =============================================================================
