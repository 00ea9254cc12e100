//! Pluggable query classification.
//!
//! A [`Classifier`] maps query text to an [`Answer`] or reports that it has
//! no confident match. Variants: ordered keyword groups, passage retrieval,
//! and a hybrid that tries keywords before retrieval.

use bulls_core::config::{ChatConfig, ClassifierKind};
use bulls_core::Answer;

use crate::knowledge::{default_keyword_groups, default_passages, KeywordGroup};
use crate::retrieval::PassageRetriever;

/// Outcome of classifying one query.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Matched(Answer),
    NoConfidentMatch,
}

/// Maps query text to a selected answer.
///
/// Implementations are shared across request tasks and must be safe for
/// concurrent `classify` calls.
pub trait Classifier: Send + Sync {
    /// Short identifier reported by the health endpoint.
    fn name(&self) -> &'static str;

    fn classify(&self, text: &str) -> Classification;
}

// =============================================================================
// KeywordClassifier
// =============================================================================

/// Case-insensitive substring matcher over ordered keyword groups.
///
/// The first group (in declaration order) with any keyword contained in the
/// query wins. There is no scoring between groups.
pub struct KeywordClassifier {
    groups: Vec<KeywordGroup>,
}

impl KeywordClassifier {
    pub fn new(groups: Vec<KeywordGroup>) -> Self {
        Self { groups }
    }

    /// Index of the first matching group, if any.
    pub fn matching_group(&self, text: &str) -> Option<usize> {
        let lower = text.to_lowercase();
        self.groups
            .iter()
            .position(|g| g.keywords.iter().any(|k| lower.contains(k.as_str())))
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(default_keyword_groups())
    }
}

impl Classifier for KeywordClassifier {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn classify(&self, text: &str) -> Classification {
        match self.matching_group(text) {
            Some(idx) => {
                tracing::debug!(group = idx, "Keyword group matched");
                Classification::Matched(Answer::canned(self.groups[idx].answer.clone()))
            }
            None => Classification::NoConfidentMatch,
        }
    }
}

// =============================================================================
// HybridClassifier
// =============================================================================

/// Keyword groups first, passage retrieval second.
pub struct HybridClassifier {
    keyword: KeywordClassifier,
    retriever: PassageRetriever,
}

impl HybridClassifier {
    pub fn new(keyword: KeywordClassifier, retriever: PassageRetriever) -> Self {
        Self { keyword, retriever }
    }
}

impl Classifier for HybridClassifier {
    fn name(&self) -> &'static str {
        "hybrid"
    }

    fn classify(&self, text: &str) -> Classification {
        match self.keyword.classify(text) {
            Classification::Matched(answer) => Classification::Matched(answer),
            Classification::NoConfidentMatch => self.retriever.classify(text),
        }
    }
}

/// Build the configured classifier over the built-in knowledge base.
pub fn build_classifier(config: &ChatConfig) -> Box<dyn Classifier> {
    let retriever = || PassageRetriever::new(default_passages(), config.min_relevance, config.top_k);
    match config.classifier {
        ClassifierKind::Keyword => Box::new(KeywordClassifier::default()),
        ClassifierKind::Retrieval => Box::new(retriever()),
        ClassifierKind::Hybrid => Box::new(HybridClassifier::new(
            KeywordClassifier::default(),
            retriever(),
        )),
    }
}

// =============================================================================
// Tests
// =============================================================================
