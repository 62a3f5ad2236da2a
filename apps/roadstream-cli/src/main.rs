use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use roadstream_driver::{DriveConfig, FrameDriver};
use roadstream_render::{Clock, HeadlessScene, ManualClock, Scene};
use roadstream_tools::WorldInspector;
use tracing_subscriber::EnvFilter;

const FRAME_SECS: f64 = 1.0 / 60.0;

#[derive(Parser)]
#[command(name = "roadstream-cli", about = "Headless runner for the endless road")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Drive for a number of frames and print the world summary
    Run {
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// RNG seed; overrides the config file
        #[arg(short, long)]
        seed: Option<u64>,
        /// YAML drive configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Also list the loaded road segments
        #[arg(long)]
        segments: bool,
    },
    /// Drive twice with the same seed and compare state hashes
    Replay {
        #[arg(short, long, default_value = "600")]
        frames: u64,
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
    /// Drive for a long time, checking world invariants every frame
    Soak {
        #[arg(short, long, default_value = "20000")]
        frames: u64,
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Upper bound on live entities
        #[arg(long, default_value = "600")]
        max_entities: usize,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<PathBuf>, seed: Option<u64>) -> anyhow::Result<DriveConfig> {
    let mut config = match path {
        Some(path) => DriveConfig::load(&path)?,
        None => DriveConfig::default(),
    };
    if seed.is_some() {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}

/// Run `frames` ticks at a fixed 60 Hz clock.
fn drive(config: DriveConfig, frames: u64) -> (FrameDriver, HeadlessScene) {
    let mut scene = HeadlessScene::new();
    let mut driver = FrameDriver::new(config, &mut scene);
    let mut clock = ManualClock::new();
    for _ in 0..frames {
        clock.advance(FRAME_SECS);
        driver.tick(&mut scene, clock.elapsed_secs());
    }
    (driver, scene)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("roadstream-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", roadstream_render::crate_info());
            println!("procgen: {}", roadstream_procgen::crate_info());
            println!("stream: {}", roadstream_stream::crate_info());
            println!("animate: {}", roadstream_animate::crate_info());
            println!("driver: {}", roadstream_driver::crate_info());
            println!("tools: {}", roadstream_tools::crate_info());
        }
        Commands::Run {
            frames,
            seed,
            config,
            json,
            segments,
        } => {
            let config = load_config(config, seed)?;
            let (driver, scene) = drive(config, frames);
            let summary = WorldInspector::summary(driver.world());
            let costs = driver.costs();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Seed: {}", driver.seed());
                println!("{summary}");
                println!(
                    "Scene: nodes={} frames={}",
                    scene.node_count(),
                    scene.frames_submitted()
                );
                println!(
                    "Stream cost over last {} frames: avg {:?} max {:?}, entities avg {:.1} max {}",
                    costs.count(),
                    costs.average_duration(),
                    costs.max_duration(),
                    costs.average_entities(),
                    costs.max_entities()
                );
            }
            if segments {
                let z = driver.world().vehicle().z();
                if let Some(current) = WorldInspector::segment_at(driver.world(), z) {
                    println!("Under vehicle: {current}");
                }
                for info in WorldInspector::list_segments(driver.world()) {
                    println!("  {info}");
                }
            }
        }
        Commands::Replay { frames, seed } => {
            println!("Deterministic replay: seed={seed}, frames={frames}");
            let config = load_config(None, Some(seed))?;
            let (first, _) = drive(config.clone(), frames);
            let (second, _) = drive(config, frames);
            let a = WorldInspector::summary(first.world());
            let b = WorldInspector::summary(second.world());
            for (run, s) in [(1, &a), (2, &b)] {
                println!(
                    "Run {run}: tick={} entities={} hash={:016x}",
                    s.tick,
                    s.counts.total(),
                    s.state_hash
                );
            }
            if a.state_hash != b.state_hash {
                bail!("replay diverged");
            }
            println!("Match: OK");
        }
        Commands::Soak {
            frames,
            seed,
            max_entities,
            config,
        } => {
            let config = load_config(config, Some(seed))?;
            tracing::info!(frames, seed, max_entities, "soak started");
            let mut scene = HeadlessScene::new();
            // Violations are reported below instead of panicking inside tick.
            let mut driver = FrameDriver::new(config, &mut scene).without_invariant_panics();
            let mut clock = ManualClock::new();
            let mut peak = 0;
            for frame in 0..frames {
                clock.advance(FRAME_SECS);
                let exhausted = driver
                    .tick(&mut scene, clock.elapsed_secs())
                    .stream
                    .budget_exhausted;
                if !exhausted {
                    driver
                        .check_invariants()
                        .with_context(|| format!("frame {frame}"))?;
                }
                let live = driver.world().entity_count();
                peak = peak.max(live);
                if live > max_entities {
                    bail!("frame {frame}: {live} live entities exceeds bound {max_entities}");
                }
            }
            let summary = WorldInspector::summary(driver.world());
            println!("Soak passed: {frames} frames, peak entities {peak}");
            println!("{summary}");
        }
    }

    Ok(())
}
