use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::types::DEFAULT_SESSION_ID;

/// Top-level configuration for the BullsAI server and client.
///
/// Loaded from `~/.bulls/config.toml` by default. Every section is optional
/// and falls back to its `Default` impl.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BullsConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl BullsConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BullsConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Interface the API server binds to.
    pub host: String,
    /// API server port.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Which classifier backs the answer resolver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Ordered keyword groups, first match wins.
    Keyword,
    /// Term-vector similarity over the knowledge base.
    Retrieval,
    /// Keyword groups first, then retrieval.
    #[default]
    Hybrid,
}

/// What the resolver does when the classifier has no confident match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Report low confidence to the caller.
    #[default]
    Decline,
    /// Pick uniformly at random from the default answer pool.
    Pool,
}

/// Answer resolution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Whether the chat endpoint answers at all.
    pub enabled: bool,
    /// Session id assumed when a request omits one.
    pub default_session_id: String,
    /// Maximum message length in characters.
    pub max_message_length: usize,
    /// Classifier variant.
    pub classifier: ClassifierKind,
    /// Behavior when nothing matches confidently.
    pub fallback: FallbackPolicy,
    /// Minimum cosine similarity for a retrieved passage to count (0.0 to 1.0).
    pub min_relevance: f64,
    /// Number of candidate passages kept as sources.
    pub top_k: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_session_id: DEFAULT_SESSION_ID.to_string(),
            max_message_length: 2000,
            classifier: ClassifierKind::default(),
            fallback: FallbackPolicy::default(),
            min_relevance: 0.15,
            top_k: 3,
        }
    }
}

/// Client dispatcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the answer resolution service.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Session id sent with every query.
    pub session_id: String,
    /// Overrides the built-in "server unreachable" assistant message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_message: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            timeout_secs: 30,
            session_id: DEFAULT_SESSION_ID.to_string(),
            fallback_message: None,
        }
    }
}

impl ClientConfig {
    /// The assistant message shown when the service cannot be reached.
    pub fn fallback_text(&self) -> String {
        self.fallback_message.clone().unwrap_or_else(|| {
            format!(
                "I'm having trouble connecting to the server. Please make sure the backend is running on {}",
                self.api_base_url
            )
        })
    }
}

/// Cross-origin settings for the dashboard frontend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}
