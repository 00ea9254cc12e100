//! Answer resolver: validates a query, classifies it, and applies the
//! no-match policy.
//!
//! The resolver holds no per-session state; concurrent `resolve` calls are
//! independent and may share one instance behind an `Arc`.

use rand::seq::IndexedRandom;

use bulls_core::config::{ChatConfig, FallbackPolicy};
use bulls_core::{Answer, Query};

use crate::classifier::{build_classifier, Classification, Classifier};
use crate::error::ChatError;
use crate::knowledge::default_answer_pool;

/// Resolves one [`Query`] to exactly one [`Answer`] or one error.
pub struct AnswerResolver {
    classifier: Box<dyn Classifier>,
    fallback: FallbackPolicy,
    pool: Vec<String>,
    enabled: bool,
    max_message_length: usize,
}

impl AnswerResolver {
    /// Create a resolver with the classifier named in `config`.
    pub fn new(config: &ChatConfig) -> Self {
        Self::with_classifier(build_classifier(config), config)
    }

    /// Create a resolver around a caller-supplied classifier.
    pub fn with_classifier(classifier: Box<dyn Classifier>, config: &ChatConfig) -> Self {
        Self {
            classifier,
            fallback: config.fallback,
            pool: default_answer_pool(),
            enabled: config.enabled,
            max_message_length: config.max_message_length,
        }
    }

    /// Replace the answer pool used by [`FallbackPolicy::Pool`].
    pub fn with_pool(mut self, pool: Vec<String>) -> Self {
        self.pool = pool;
        self
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Resolve a query.
    ///
    /// Fails with `InvalidRequest` for a blank message. `session_id` is
    /// never consulted.
    pub fn resolve(&self, query: &Query) -> Result<Answer, ChatError> {
        if !self.enabled {
            return Err(ChatError::Disabled);
        }

        let message = query.message.trim();
        if message.is_empty() {
            return Err(ChatError::InvalidRequest(
                "message cannot be empty".to_string(),
            ));
        }
        if message.chars().count() > self.max_message_length {
            return Err(ChatError::MessageTooLong(self.max_message_length));
        }

        match self.classifier.classify(message) {
            Classification::Matched(answer) => Ok(answer),
            Classification::NoConfidentMatch => self.no_match(),
        }
    }

    fn no_match(&self) -> Result<Answer, ChatError> {
        match self.fallback {
            FallbackPolicy::Decline => Err(ChatError::LowConfidence),
            FallbackPolicy::Pool => {
                let picked = self
                    .pool
                    .choose(&mut rand::rng())
                    .ok_or(ChatError::LowConfidence)?;
                tracing::debug!("No classifier match; answering from default pool");
                Ok(Answer::canned(picked.clone()))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::KeywordClassifier;
    use crate::knowledge::FINANCIAL_ANSWER;
    use bulls_core::config::ClassifierKind;

    fn keyword_config(fallback: FallbackPolicy) -> ChatConfig {
        ChatConfig {
            classifier: ClassifierKind::Keyword,
            fallback,
            ..ChatConfig::default()
        }
    }

    #[test]
    fn test_empty_message_is_invalid_request() {
        let resolver = AnswerResolver::new(&ChatConfig::default());
        for msg in ["", "   ", "\n\t"] {
            let err = resolver.resolve(&Query::new(msg)).unwrap_err();
            assert!(matches!(err, ChatError::InvalidRequest(_)));
        }
    }

    #[test]
    fn test_disabled_returns_error() {
        let config = ChatConfig {
            enabled: false,
            ..ChatConfig::default()
        };
        let err = AnswerResolver::new(&config)
            .resolve(&Query::new("revenue"))
            .unwrap_err();
        assert!(matches!(err, ChatError::Disabled));
    }

    #[test]
    fn test_message_too_long() {
        let config = ChatConfig {
            max_message_length: 10,
            ..ChatConfig::default()
        };
        let resolver = AnswerResolver::new(&config);
        assert!(matches!(
            resolver.resolve(&Query::new("a".repeat(11))).unwrap_err(),
            ChatError::MessageTooLong(10)
        ));
        // Limit counts characters, not bytes.
        let err = resolver.resolve(&Query::new("é".repeat(10))).unwrap_err();
        assert!(matches!(err, ChatError::LowConfidence));
    }

    #[test]
    fn test_revenue_scenario_is_byte_exact() {
        let resolver = AnswerResolver::new(&keyword_config(FallbackPolicy::Decline));
        let answer = resolver
            .resolve(&Query::new("What about revenue growth this quarter?"))
            .unwrap();
        assert_eq!(answer.text, FINANCIAL_ANSWER);
    }

    #[test]
    fn test_pool_policy_answers_from_pool() {
        let resolver = AnswerResolver::new(&keyword_config(FallbackPolicy::Pool));
        let pool = default_answer_pool();
        for _ in 0..50 {
            let answer = resolver.resolve(&Query::new("hello")).unwrap();
            assert!(pool.contains(&answer.text));
            assert!(answer.sources.is_empty());
        }
    }

    #[test]
    fn test_decline_policy_reports_low_confidence() {
        let resolver = AnswerResolver::new(&keyword_config(FallbackPolicy::Decline));
        assert!(matches!(
            resolver.resolve(&Query::new("hello")).unwrap_err(),
            ChatError::LowConfidence
        ));
    }

    #[test]
    fn test_pool_policy_with_empty_pool_declines() {
        let resolver =
            AnswerResolver::new(&keyword_config(FallbackPolicy::Pool)).with_pool(Vec::new());
        assert!(matches!(
            resolver.resolve(&Query::new("hello")).unwrap_err(),
            ChatError::LowConfidence
        ));
    }

    #[test]
    fn test_every_non_empty_message_yields_text_under_pool() {
        let resolver = AnswerResolver::new(&ChatConfig {
            fallback: FallbackPolicy::Pool,
            ..ChatConfig::default()
        });
        for msg in ["hello", "revenue", "dividend yield", "?", "zzz qqq", "EV charging plans"] {
            let answer = resolver.resolve(&Query::new(msg)).unwrap();
            assert!(!answer.text.is_empty());
        }
    }

    #[test]
    fn test_session_id_does_not_affect_selection() {
        let resolver = AnswerResolver::new(&keyword_config(FallbackPolicy::Decline));
        let a = resolver
            .resolve(&Query::new("renewable targets").with_session("alpha"))
            .unwrap();
        let b = resolver
            .resolve(&Query::new("renewable targets").with_session("beta"))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_classifier() {
        let resolver = AnswerResolver::with_classifier(
            Box::new(KeywordClassifier::new(Vec::new())),
            &ChatConfig::default(),
        );
        assert_eq!(resolver.classifier_name(), "keyword");
        assert_eq!(resolver.fallback_policy(), FallbackPolicy::Decline);
        assert!(resolver.resolve(&Query::new("revenue")).is_err());
    }
}
