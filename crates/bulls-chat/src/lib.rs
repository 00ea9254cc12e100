//! Answer resolution for BullsAI.
//!
//! Provides the pluggable query classifiers (keyword groups, passage
//! retrieval, hybrid), the built-in knowledge base, intent flags, and the
//! stateless resolver behind `POST /api/chat`.

pub mod classifier;
pub mod error;
pub mod intent;
pub mod knowledge;
pub mod resolver;
pub mod retrieval;

pub use classifier::{
    build_classifier, Classification, Classifier, HybridClassifier, KeywordClassifier,
};
pub use error::ChatError;
pub use intent::analyze_intent;
pub use knowledge::{KeywordGroup, Passage};
pub use resolver::AnswerResolver;
pub use retrieval::PassageRetriever;
