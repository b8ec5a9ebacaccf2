//! Lanyard - Main entry point
//!
//! An interactive lanyard/keyring scene: a physically simulated band chain
//! with a draggable card, rendered as a ribbon curve.

mod app;
mod config;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "lanyard")]
#[command(about = "Interactive lanyard and keyring scene")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "lanyard.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Start with the physics collider overlay enabled
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Lanyard v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    // CLI flag wins over the config file
    if args.debug {
        config.scene.debug = true;
    }

    info!(
        gravity = ?config.physics.gravity,
        timestep = config.physics.timestep,
        "Configuration loaded"
    );

    app::run(config);

    Ok(())
}
