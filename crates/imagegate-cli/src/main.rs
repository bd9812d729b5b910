mod commands;

use clap::{Parser, Subcommand};
use commands::{BuildCommitArgs, BuildPrArgs, CheckCommitArgs, CheckPrArgs};
use imagegate_core::GateConfig;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "imagegate",
    about = "Rebuild container images only when a PR or commit touches their build scope"
)]
#[command(version)]
struct Cli {
    /// Path to imagegate.toml (default: ./imagegate.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the revision, diff it, and skip or build the image
    Check {
        #[command(subcommand)]
        action: CheckAction,
    },
    /// Build the image in an existing clone unless the status file says Skipped
    Build {
        #[command(subcommand)]
        action: BuildAction,
    },
}

#[derive(Subcommand)]
enum CheckAction {
    /// Diff a PR head against its base; build without pushing
    Pr(CheckPrArgs),
    /// Diff a commit against its parent; build and push
    Commit(CheckCommitArgs),
}

#[derive(Subcommand)]
enum BuildAction {
    /// Build a docker image for a PR. All layers are built, nothing is pushed
    Pr(BuildPrArgs),
    /// Build a docker image for a commit and push it to the registry
    Commit(BuildCommitArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GateConfig::load_from(path)?,
        None => GateConfig::load(Path::new("."))?,
    };

    match cli.command {
        Commands::Check { action } => match action {
            CheckAction::Pr(args) => commands::check_pr(&config, args).await?,
            CheckAction::Commit(args) => commands::check_commit(&config, args).await?,
        },
        Commands::Build { action } => match action {
            BuildAction::Pr(args) => commands::build_pr(&config, args)?,
            BuildAction::Commit(args) => commands::build_commit(&config, args)?,
        },
    }

    Ok(())
}

/// `RUST_LOG` when set and valid, otherwise `info`.
fn env_filter() -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info"),
    }
}
