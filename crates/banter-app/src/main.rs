//! Banter demo shell - composition root.
//!
//! Ties the crates together into a line-oriented console companion:
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Install the tracing subscriber
//! 3. Build the dispatcher with file-backed rules and console collaborators
//! 4. Read utterances from stdin and dispatch each one

mod cli;
mod hosts;

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use banter_core::config::BanterConfig;
use banter_dispatch::{Collaborators, ResponseDispatcher};

use crate::cli::CliArgs;
use crate::hosts::{ConsoleRenderer, DirCueLibrary, FileRuleSource, LogAnimationDriver, LogCuePlayer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let mut config = BanterConfig::load_or_default(&config_file);

    // Credentials come from the environment when the config leaves them blank.
    if config.llm.api_key.is_empty() {
        if let Ok(key) = std::env::var("BANTER_API_KEY") {
            config.llm.api_key = key;
        }
    }

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Banter v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    let rules_path = args.resolve_rules_path(&config.rules.path);
    let collaborators = Collaborators {
        rule_source: Box::new(FileRuleSource::new(rules_path)),
        cue_library: Box::new(DirCueLibrary::new(PathBuf::from(&config.audio.cue_dir))),
        cue_player: Box::new(LogCuePlayer),
        animation_driver: Box::new(LogAnimationDriver::new(&config.animation)),
        renderer: Box::new(ConsoleRenderer::default()),
    };

    let mut dispatcher = ResponseDispatcher::new(&config, collaborators)?;
    dispatcher.on_start();

    println!("Banter ready. Type a question, or Ctrl-D to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match dispatcher.on_submit(&line).await {
            Ok(reply) => {
                tracing::debug!(intent = %reply.intent, source = ?reply.source, "Reply emitted");
            }
            Err(e) => {
                tracing::error!(error = %e, "Dispatch failed");
            }
        }
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}
