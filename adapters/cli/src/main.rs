#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that launches Fish Survivor.
//!
//! `play` opens the Macroquad window; `simulate` runs a headless session with
//! a simple autopilot and prints a summary.

mod autopilot;
mod config;
mod play;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use fish_survivor_simulation::Game;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Overrides;
use crate::play::PlayOptions;

/// Command-line arguments for the Fish Survivor executable.
#[derive(Debug, Parser)]
#[command(name = "fish-survivor", version, about = "Underwater survival game")]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,
    #[command(subcommand)]
    command: CliCommand,
}

/// Options shared by every subcommand.
#[derive(Debug, Args)]
struct GlobalOptions {
    /// Seed for the run's random number generator.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// TOML file overriding the default tuning.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Play field width in pixels.
    #[arg(long, global = true)]
    width: Option<f32>,
    /// Play field height in pixels.
    #[arg(long, global = true)]
    height: Option<f32>,
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Open the game window.
    Play(PlayArgs),
    /// Run a headless session and print a summary.
    Simulate(SimulateArgs),
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Disable vertical sync.
    #[arg(long)]
    no_vsync: bool,
    /// Skip loading sprites and draw fallback shapes.
    #[arg(long)]
    no_sprites: bool,
    /// Sprite manifest to load.
    #[arg(long, value_name = "PATH", default_value = "assets/manifest.toml")]
    assets: PathBuf,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    /// Simulated seconds to run for.
    #[arg(long, default_value_t = 300.0)]
    seconds: f32,
    /// Fixed time step in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

/// Entry point for the Fish Survivor command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let tuning = config::load_tuning(
        cli.global.config.as_deref(),
        Overrides {
            seed: cli.global.seed,
            width: cli.global.width,
            height: cli.global.height,
        },
    )?;

    match cli.command {
        CliCommand::Play(args) => play::run(
            tuning,
            PlayOptions {
                vsync: !args.no_vsync,
                sprites: !args.no_sprites,
                manifest: args.assets,
            },
        ),
        CliCommand::Simulate(args) => {
            info!(seed = tuning.seed, seconds = args.seconds, "simulating");
            let mut game = Game::new(tuning)?;
            let summary = autopilot::run(&mut game, args.seconds, args.dt)?;
            println!("{summary}");
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
