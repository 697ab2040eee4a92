use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use boid_cli::{load_events, load_settings, HeadlessRunner};
use boid_core::FlockConfig;
use boid_shared::BoidSettings;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "A simulation of Craig Reynolds' boids", long_about = None)]
struct Args {
    /// Number of boids at start (overrides the settings file)
    #[arg(short = 'n', long = "num-boids")]
    num_boids: Option<usize>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 100)]
    steps: u64,

    /// Random seed; a fresh one is drawn and logged when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON array of click events, e.g. [{"frame": 10, "button": "left", "position": {"x": 320, "y": 240}}]
    #[arg(short, long)]
    events: Option<PathBuf>,

    /// Write snapshots here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a snapshot every N frames as well as the last one
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    every: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut settings = match &args.config {
        Some(path) => load_settings(path)?,
        None => BoidSettings::default(),
    };
    if let Some(num_boids) = args.num_boids {
        settings.num_boids = num_boids;
    }
    let config = FlockConfig::from(settings);

    let events = match &args.events {
        Some(path) => load_events(path)?,
        None => Vec::new(),
    };
    log::info!("Loaded {} click events", events.len());

    let seed = args.seed.unwrap_or_else(rand::random);

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut runner = HeadlessRunner::new(config, seed, events, args.every, output)
        .context("Failed to initialize simulation")?;

    runner.run(args.steps).context("Simulation error")?;

    Ok(())
}
