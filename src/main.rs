use anyhow::Result;
use cadence::commands::{
    check_edge, drift, gate, lifecycle, override_cmd, progress, validate, waves,
};
use cadence::models::track::TrackStatus;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Track dependency graph engine: scheduling, gating, drift", long_about = None)]
#[command(version)]
struct Cli {
    /// Root of the track store
    #[arg(long, global = true, default_value = "conductor")]
    store_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the dependency graph (cycles, dangling references)
    Validate,

    /// Check whether adding one dependency edge would create a cycle
    CheckEdge {
        /// Track that would gain the dependency
        #[arg(long)]
        from: String,

        /// Track it would depend on
        #[arg(long)]
        to: String,
    },

    /// Compute waves from dependencies, or verify authored wave numbers
    Waves {
        /// Verify the wave numbers tracks already carry instead of computing
        #[arg(long)]
        verify: bool,
    },

    /// Evaluate the completion gate for a wave
    Gate {
        /// Wave number to gate
        #[arg(long)]
        wave: u32,

        /// Skip running verification commands (reported as warnings)
        #[arg(long)]
        skip_verification: bool,

        /// Per-command verification timeout in seconds (default 300)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Record a manual override of a failed gate check
    Override {
        /// Track to annotate
        #[arg(long)]
        track: String,

        /// Name of the overridden check
        #[arg(long)]
        check: String,

        /// Justification for the override (required, audited)
        #[arg(long)]
        reason: String,
    },

    /// Validate track lifecycle state against recorded facts
    Lifecycle {
        /// Restrict to one track
        #[arg(long)]
        track: Option<String>,

        /// Also validate a requested status transition (requires --track)
        #[arg(long, requires = "track")]
        to: Option<TrackStatus>,
    },

    /// Report drift between the component inventory and track claims
    Drift,

    /// Report weighted completion progress
    Progress,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {e:#}", "✗".red().bold());
            std::process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let store_dir = cli.store_dir.as_path();

    match cli.command {
        Commands::Validate => validate::execute(store_dir),
        Commands::CheckEdge { from, to } => check_edge::execute(store_dir, &from, &to),
        Commands::Waves { verify } => waves::execute(store_dir, verify),
        Commands::Gate {
            wave,
            skip_verification,
            timeout,
        } => gate::execute(store_dir, wave, skip_verification, timeout),
        Commands::Override {
            track,
            check,
            reason,
        } => override_cmd::execute(store_dir, &track, &check, &reason),
        Commands::Lifecycle { track, to } => {
            lifecycle::execute(store_dir, track.as_deref(), to)
        }
        Commands::Drift => drift::execute(store_dir),
        Commands::Progress => progress::execute(store_dir),
    }
}
