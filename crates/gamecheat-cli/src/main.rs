#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
mod bindings;
mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use gamecheat::EngineConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gamecheat=info".parse()?))
        .init();

    let cli = Cli::parse();

    // Load config
    let config = match EngineConfig::load(&cli.config) {
        Ok(c) => {
            info!("Loaded config from {:?}", cli.config);
            c
        }
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            EngineConfig::default()
        }
    };

    match cli.command {
        Command::Cheat(args) => commands::cheat::run(&config, cli.game, &args),
        Command::Supply(args) => commands::supply::run(&config, cli.game, &args),
        Command::Resources(args) => commands::resources::run(&config, cli.game, &args),
        Command::BuildSpeed(args) => commands::build_speed::run(&config, cli.game, &args),
        Command::Hotkeys(args) => commands::hotkeys::run(&config, cli.game, &args),
    }
}
