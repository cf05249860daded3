//! Metapack CLI - mpk command

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use cli_lib::cmd;
use std::path::PathBuf;

/// Metapack - automatic metadata archiving for asset projects
#[derive(Parser)]
#[command(name = "mpk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize metapack in the current project
    Init,
    /// Rebuild the metadata archive now
    Compress,
    /// Extract the metadata archive onto disk
    Extract,
    /// Delete every matching metadata file
    Clean {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Trigger the host asset-refresh hook
    Reimport,
    /// Enable or disable automatic compression
    Auto {
        /// Desired state
        #[arg(value_enum)]
        state: AutoState,
    },
    /// Show project and archive status
    Status,
    /// Watch the asset tree and compress on changes
    Watch {
        /// Override the drain tick interval in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
    },
    /// Run an auxiliary script through the configured interpreter
    Script {
        /// Script path
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AutoState {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => cmd::init::run().await,
        Commands::Compress => cmd::compress::run().await,
        Commands::Extract => cmd::extract::run().await,
        Commands::Clean { yes } => cmd::clean::run(yes).await,
        Commands::Reimport => cmd::reimport::run().await,
        Commands::Auto { state } => cmd::auto::run(matches!(state, AutoState::On)).await,
        Commands::Status => cmd::status::run().await,
        Commands::Watch { tick_ms } => cmd::watch::run(tick_ms).await,
        Commands::Script { path } => cmd::script::run(&path).await,
    }
}
