//! Wordcue - replay word-level editing sessions
//!
//! Loads a clip project, applies a JSON script of editing intents through
//! the core engine and prints the resulting state:
//! - Interaction state (focus, grouping, selection)
//! - Clips with mirrored assets and tracks
//! - Per-word animation tracks

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use wordcue_core::EditorConfig;

mod replay;

/// Wordcue - word-level subtitle editing engine
#[derive(Parser)]
#[command(name = "wordcue")]
#[command(about = "Replay word-level editing sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.wordcue/config.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a script of intents to a project and print the final state
    Replay {
        /// JSON list of clips
        #[arg(short, long)]
        project: PathBuf,

        /// JSON list of intents
        #[arg(short, long)]
        script: PathBuf,

        /// JSON map of plugin key to time offset and default params
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = EditorConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Replay {
            project,
            script,
            manifest,
            compact,
        } => {
            let report = replay::run(replay::ReplayInput {
                project: &project,
                script: &script,
                manifest: manifest.as_deref(),
                config,
            })
            .await?;
            tracing::info!(
                applied = report.applied,
                failed = report.failed,
                "Replay finished"
            );

            let value = replay::to_json(&report)?;
            if compact {
                println!("{}", value);
            } else {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
        }
        Commands::Config => {
            println!("history_limit = {}", config.history_limit);
            println!("min_timing_gap = {}", config.min_timing_gap);
            println!(
                "default_intensity = {{ min = {}, max = {} }}",
                config.default_intensity.min, config.default_intensity.max
            );
            println!(
                "default_track_timing = {{ start = {}, end = {} }}",
                config.default_track_timing.start, config.default_track_timing.end
            );
        }
    }

    Ok(())
}
