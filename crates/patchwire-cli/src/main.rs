//! Patchwire CLI - inspect, validate and run modular patches.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "patchwire")]
#[command(author, version, about = "Patchwire modular editor CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List module kinds, or show one kind's ports and parameters
    Kinds(commands::kinds::KindsArgs),

    /// Validate a patch without playing it
    Check(commands::check::CheckArgs),

    /// Load a patch and run its clock
    Play(commands::play::PlayArgs),

    /// List and manage patches
    Patches(commands::patches::PatchesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Kinds(args) => commands::kinds::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Play(args) => commands::play::run(args),
        Commands::Patches(args) => commands::patches::run(args),
    }
}
