//! Application state shared across all route handlers.
//!
//! Passed to handlers via axum's State extractor. Everything inside is
//! immutable after startup, so no locking is needed.

use std::sync::Arc;
use std::time::Instant;

use bulls_chat::AnswerResolver;
use bulls_core::config::BullsConfig;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<BullsConfig>,
    /// Stateless answer resolver.
    pub resolver: Arc<AnswerResolver>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Create state with the resolver described by `config.chat`.
    pub fn new(config: BullsConfig) -> Self {
        let resolver = AnswerResolver::new(&config.chat);
        Self::with_resolver(config, resolver)
    }

    /// Create state around a caller-built resolver.
    pub fn with_resolver(config: BullsConfig, resolver: AnswerResolver) -> Self {
        Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
            start_time: Instant::now(),
        }
    }
}
