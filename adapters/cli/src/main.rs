#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Gravity Well session.

mod session;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use gravity_well_world::Config;
use tracing_subscriber::EnvFilter;

use crate::session::{Session, Summary};

/// Runs a scripted power-up session and reports what happened.
#[derive(Debug, Parser)]
#[command(name = "gravity-well", version)]
struct Args {
    /// TOML file overriding the default simulation configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of fixed 60 Hz steps to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u32,
    /// Seed for the spawn sequence, overriding the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Print the summary as JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// Entry point for the Gravity Well command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }

    let mut session = Session::new(&config)?;
    session.run(args.ticks);
    let summary = session.summary();

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("failed to encode summary")?
        );
    } else {
        print_report(&summary);
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

fn print_report(summary: &Summary) {
    println!(
        "Simulated {} ticks ({:.1} s)",
        summary.ticks, summary.simulated_seconds
    );
    println!(
        "Collectibles on field: {}  live force sources: {}",
        summary.collectibles, summary.force_sources
    );
    if summary.stored.is_empty() {
        println!("Stored: none");
    } else {
        for (kind, count) in &summary.stored {
            println!("Stored {kind}: {count}");
        }
    }
    if summary.time_warp_remaining_seconds > 0.0 {
        println!(
            "Time warp active for another {:.1} s",
            summary.time_warp_remaining_seconds
        );
    }
    println!(
        "Events: {}",
        serde_json::to_string(&summary.events).unwrap_or_default()
    );
    println!(
        "Debris: {} particles, mean speed {:.1}, max speed {:.1}, centroid ({:.1}, {:.1})",
        summary.debris.particles,
        summary.debris.mean_speed,
        summary.debris.max_speed,
        summary.debris.centroid[0],
        summary.debris.centroid[1]
    );
}
