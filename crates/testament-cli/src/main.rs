#![deny(unsafe_code)]

//! Testament CLI — resolve verse references from the shell, or run the bot
//! against stdin.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use testament_config::AppConfig;
use testament_core::message::Envelope;
use testament_core::{Bot, Daemon, MemoryStore, OutputFormatter, Passage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Testament — quote scripture by chapter and verse.
#[derive(Parser)]
#[command(name = "testament", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "testament.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a reference such as `$2:110-120` and print the passage.
    Resolve {
        /// The reference, including the sentinel.
        reference: String,
    },

    /// Print a random verse.
    Random,

    /// Read messages from stdin and print the bot's replies.
    Console {
        /// Sender name attached to each line.
        #[arg(long, default_value = "console")]
        user: String,
    },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Log filter for `-v` flags, falling back to the configured level.
fn log_filter(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_ascii_lowercase(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, found) = load_config(&cli.config).await?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose, &config.logging.level))),
        )
        .with_writer(std::io::stderr)
        .init();

    if !found {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    match cli.command {
        Commands::Resolve { reference } => cmd_resolve(&config, &reference).await?,
        Commands::Random => cmd_random(&config).await?,
        Commands::Console { user } => cmd_console(&config, &user).await?,
        Commands::Config { show } => cmd_config(&config, &cli.config, show)?,
    }

    Ok(())
}

async fn cmd_resolve(config: &AppConfig, reference: &str) -> Result<()> {
    let bot = load_bot(config).await?;
    let passage = bot
        .resolver()
        .resolve(reference)
        .await
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.kind()))?;
    print_passage(config, &passage);
    Ok(())
}

async fn cmd_random(config: &AppConfig) -> Result<()> {
    let bot = load_bot(config).await?;
    let passage = bot
        .resolver()
        .resolve_random()
        .await
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.kind()))?;
    print_passage(config, &passage);
    Ok(())
}

fn print_passage(config: &AppConfig, passage: &Passage) {
    let formatter = OutputFormatter::new(
        config.output.max_length,
        config.output.envelope.clone(),
        config.output.ellipsis.clone(),
    );
    if let Some(text) = formatter.format(&passage.text) {
        println!("{text}");
    }
}

async fn cmd_console(config: &AppConfig, user: &str) -> Result<()> {
    let daemon = Arc::new(Daemon::new(load_bot(config).await?));
    let sender = daemon.message_sender();
    let mut replies = daemon.message_subscriber();

    let runner = tokio::spawn({
        let daemon = Arc::clone(&daemon);
        async move { daemon.run().await }
    });

    let printer = tokio::spawn(async move {
        forward_replies(&mut replies, |line| println!("{line}")).await
    });

    info!(user = %user, "Console ready, reading messages from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        sender
            .send(Envelope::new("console", user, &line))
            .context("message bus closed")?;
    }

    daemon.shutdown();
    runner.await??;

    // Dropping the last senders closes the bus once the printer has drained it.
    drop(sender);
    drop(daemon);
    printer.await?;
    Ok(())
}

/// Pass every outbound message on `replies` to `emit` as `@recipient body`
/// until the bus closes. Returns how many messages were lost to lag.
async fn forward_replies(
    replies: &mut broadcast::Receiver<Envelope>,
    mut emit: impl FnMut(String),
) -> u64 {
    let mut lost = 0;
    loop {
        match replies.recv().await {
            Ok(reply) if !reply.is_inbound() => emit(format!("@{} {}", reply.sender, reply.body)),
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Console fell behind the message bus, replies were dropped");
                lost += skipped;
            }
            Err(broadcast::error::RecvError::Closed) => return lost,
        }
    }
}

fn cmd_config(config: &AppConfig, config_path: &Path, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// Load the config at `path`, or the defaults when no file exists. The flag
/// reports whether the file was found.
async fn load_config(path: &Path) -> Result<(AppConfig, bool)> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        let config = AppConfig::load(path)
            .await
            .with_context(|| format!("invalid config '{}'", path.display()))?;
        Ok((config, true))
    } else {
        Ok((AppConfig::default(), false))
    }
}

async fn load_bot(config: &AppConfig) -> Result<Bot> {
    let path = Path::new(&config.store.corpus_path);
    let store = MemoryStore::load(path)
        .await
        .with_context(|| format!("failed to load corpus '{}'", path.display()))?;
    info!(
        corpus = %path.display(),
        verses = store.len(),
        chapters = store.chapter_count(),
        "Corpus loaded"
    );
    Ok(Bot::from_config(config, Arc::new(store)))
}
