//! BullsAI application binary - composition root.
//!
//! `bulls serve` runs the answer service; `bulls ask` and `bulls chat` drive
//! the query dispatcher against a running server.

mod cli;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use bulls_api::state::AppState;
use bulls_client::{IgnoreReason, QueryDispatcher, SubmitOutcome};
use bulls_core::config::{BullsConfig, ClientConfig};

use cli::{CliArgs, Command};

/// Run the HTTP answer service until it fails.
async fn serve(config: BullsConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config.clone());
    tracing::info!(
        classifier = state.resolver.classifier_name(),
        fallback = ?state.resolver.fallback_policy(),
        enabled = config.chat.enabled,
        "Answer resolver ready"
    );

    if let Err(e) = bulls_api::start_server(&config, state).await {
        tracing::error!(error = %e, "Server stopped");
        tracing::error!("Try: BULLS_PORT={} bulls serve", config.general.port.saturating_add(1));
        return Err(e.into());
    }
    Ok(())
}

/// Send one question and print the resulting conversation.
async fn ask(
    client: &ClientConfig,
    question: &str,
    session: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dispatcher = QueryDispatcher::from_config(client)?;
    if let Some(session) = session {
        dispatcher = dispatcher.with_session_id(session);
    }

    if let SubmitOutcome::Ignored(IgnoreReason::Empty) = dispatcher.submit(question).await {
        return Err("question is empty".into());
    }
    println!("{}", dispatcher.session().transcript());
    Ok(())
}

/// Line-oriented chat on stdin until EOF or `/quit`.
async fn chat(client: &ClientConfig, session: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let session_id = session.unwrap_or_else(|| Uuid::new_v4().to_string());
    let dispatcher = QueryDispatcher::from_config(client)?.with_session_id(session_id);
    tracing::info!(session_id = dispatcher.session_id(), api = %client.api_base_url, "Chat session started");

    println!("BullsAI chat. Ask about financials, sustainability, or market position. /quit to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "/quit" | "/exit") {
            break;
        }

        match dispatcher.submit(&line).await {
            SubmitOutcome::Answered(entry) | SubmitOutcome::Fallback { entry, .. } => {
                println!("BullsAI: {}", entry.content);
            }
            SubmitOutcome::Ignored(_) => {}
        }
    }

    tracing::info!(entries = dispatcher.entries().len(), "Chat session ended");
    Ok(())
}

/// Write `config` to `path`, refusing to clobber an existing file unless forced.
fn init_config(
    config: &BullsConfig,
    path: &Path,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!("{} already exists (use --force to overwrite)", path.display()).into());
    }
    config.save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing starts so its log level can apply.
    let config_file = args.resolve_config_path();
    let loaded = BullsConfig::load(&config_file);
    let file_level = loaded
        .as_ref()
        .map(|c| c.general.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    let log_level = args.resolve_log_level(&file_level);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting BullsAI v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match loaded {
        Ok(config) => {
            tracing::info!(path = %config_file.display(), "Configuration loaded");
            config
        }
        Err(e) => {
            tracing::warn!(path = %config_file.display(), error = %e, "Using default configuration");
            BullsConfig::default()
        }
    };
    config.general.log_level = log_level;
    config.general.port = args.resolve_port(config.general.port);
    config.client.api_base_url = args.resolve_api_url(&config.client.api_base_url);

    match args.command() {
        Command::Serve => serve(config).await,
        Command::Ask { question, session } => ask(&config.client, &question.join(" "), session).await,
        Command::Chat { session } => chat(&config.client, session).await,
        Command::InitConfig { force } => init_config(&config, &config_file, force),
    }
}
