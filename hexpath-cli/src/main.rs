//! Hexpath CLI - Command-line interface
//!
//! Commands:
//! - play: Interactive session on a terminal board
//! - sim: Random-vs-random simulation batches

mod play_cmd;
mod sim_cmd;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hexpath")]
#[command(about = "Hex board game engine and terminal driver")]
struct Cli {
    /// RNG seed for reproducible bot moves and simulations
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive session
    Play(play_cmd::PlayArgs),
    /// Run random-vs-random simulation batches
    Sim(sim_cmd::SimArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Sim(args) => sim_cmd::run(args, cli.seed),
    }
}
