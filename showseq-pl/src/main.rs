//! Show sequencer playlist player (showseq-pl) - Main entry point
//!
//! Plays a single sequence entry to completion using the timing-only
//! session engine, publishing status on the event bus.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use showseq_common::config::TomlConfig;
use showseq_common::events::EventBus;
use tokio::signal;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use showseq_pl::config::Config;
use showseq_pl::entry::{bind_entry, EntryContext};
use showseq_pl::fseq::{FseqHeaderReader, HeaderReader};
use showseq_pl::playback::{PlaybackArbiter, TimedSequencePlayer};
use showseq_pl::runner::{log_events, EntryRunner};
use showseq_pl::status::BroadcastPublisher;

/// Command-line arguments for showseq-pl
#[derive(Parser, Debug)]
#[command(name = "showseq-pl")]
#[command(about = "Playlist sequence player for show files")]
#[command(version)]
struct Args {
    /// Bootstrap TOML config file
    #[arg(short, long, env = "SHOWSEQ_CONFIG")]
    config: Option<PathBuf>,

    /// Folder containing sequence files
    #[arg(short, long)]
    sequence_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print header information for a sequence
    Info {
        /// Sequence file name (relative to the sequence folder)
        sequence: String,
    },
    /// Play a sequence entry until it ends or Ctrl+C
    Play {
        /// Sequence file name (relative to the sequence folder)
        sequence: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;

    // Initialize tracing
    let default_filter = format!(
        "showseq_pl={level},showseq_common={level}",
        level = toml_config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::resolve(&toml_config, args.sequence_dir.as_deref());
    info!("Sequence folder: {}", config.sequence_dir.display());

    match args.command {
        Command::Info { sequence } => print_info(&config, &sequence),
        Command::Play { sequence } => play(&config, &sequence).await,
    }
}

fn print_info(config: &Config, sequence: &str) -> Result<()> {
    let path = config.sequence_dir.join(sequence);
    let header = FseqHeaderReader
        .read_header(&path)
        .with_context(|| format!("Failed to read header of {}", path.display()))?;

    println!("File:      {}", path.display());
    println!("Version:   {}.{}", header.major_version, header.minor_version);
    println!("Channels:  {}", header.channel_count);
    println!("Frames:    {}", header.frame_count);
    println!("Step:      {}ms", header.step_time_ms);
    println!("Duration:  {}ms", header.total_time_ms());
    Ok(())
}

async fn play(config: &Config, sequence: &str) -> Result<()> {
    let bus = EventBus::new(100);
    let reader: Arc<dyn HeaderReader> = Arc::new(FseqHeaderReader);
    let player = TimedSequencePlayer::new(&config.sequence_dir, Arc::clone(&reader));
    let ctx = EntryContext::new(
        PlaybackArbiter::new(player),
        reader,
        Arc::new(BroadcastPublisher::new(bus.clone())),
        &config.sequence_dir,
        &config.status_topic_prefix,
    );

    let mut entry = bind_entry(&json!({ "type": "sequence", "sequenceName": sequence }), &ctx)
        .context("Failed to configure sequence entry")?;
    entry.dump();

    let logger = tokio::spawn(log_events(bus.subscribe()));

    let runner = EntryRunner::from_config(bus, config);
    let outcome = runner
        .run(entry.as_mut(), shutdown_signal())
        .await
        .with_context(|| format!("Failed to play {}", sequence))?;

    info!("Sequence {} ended: {}", sequence, outcome);

    // Release every bus sender so the logger drains and sees Closed
    drop(entry);
    drop(ctx);
    drop(runner);
    match logger.await {
        Ok(logged) => debug!("Logged {} events", logged),
        Err(e) => warn!("Event logger task failed: {}", e),
    }
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
