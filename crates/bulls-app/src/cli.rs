//! CLI argument definitions for the BullsAI application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// BullsAI - stock analysis chat server and client.
#[derive(Parser, Debug)]
#[command(name = "bulls", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port", global = true)]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    /// Base URL of the server the client commands talk to.
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the answer service (default).
    Serve,
    /// Send one question and print the conversation.
    Ask {
        /// Question text; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
        /// Session id to send instead of the configured one.
        #[arg(long)]
        session: Option<String>,
    },
    /// Interactive chat on stdin. Type `/quit` to leave.
    Chat {
        /// Session id; a random one is generated when omitted.
        #[arg(long)]
        session: Option<String>,
    },
    /// Write the effective configuration to the config path.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl CliArgs {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }

    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > BULLS_CONFIG env var > platform default (~/.bulls/config.toml).
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("BULLS_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > BULLS_PORT env var > config file value > 8000.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Ok(val) = std::env::var("BULLS_PORT") {
            if let Ok(p) = val.parse::<u16>() {
                return p;
            }
        }
        if config_port != 0 {
            return config_port;
        }
        8000
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > BULLS_LOG_LEVEL env var > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        if let Some(ref l) = self.log_level {
            return l.clone();
        }
        std::env::var("BULLS_LOG_LEVEL").unwrap_or_else(|_| config_level.to_string())
    }

    /// Resolve the server base URL used by `ask` and `chat`.
    ///
    /// Priority: --api-url flag > BULLS_API_URL env var > config file value.
    pub fn resolve_api_url(&self, config_url: &str) -> String {
        if let Some(ref u) = self.api_url {
            return u.clone();
        }
        std::env::var("BULLS_API_URL").unwrap_or_else(|_| config_url.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".bulls").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".bulls").join("config.toml");
    }
    PathBuf::from("config.toml")
}
