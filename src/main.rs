use anyhow::{Context, Result};
use clap::Parser;
use flocking_common::{SimulationConfig, Snapshot};
use flocking_engine::{FlockSimulation, HeadlessWorld};
use log::{debug, error, info, trace, warn};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Headless predator/prey flocking run
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config.toml file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Log every agent's force and state each frame (needs RUST_LOG=debug)
    #[arg(long)]
    debug: bool,

    /// Number of frames to run instead of total_time_s / dt_s
    #[arg(long)]
    steps: Option<u64>,

    /// Seed for placement and predator wander
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Flocking Engine...");

    // --- Load Configuration ---
    let mut config = SimulationConfig::load(&args.config)?;
    if args.debug {
        config.run.debug = true;
    }
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    info!(
        "World {}x{}, {} agents, seed {}, force phase on {}.",
        config.world.width,
        config.world.height,
        config.flock.count,
        config.run.seed,
        if config.run.parallel {
            format!("{} rayon threads", rayon::current_num_threads())
        } else {
            "one thread".to_string()
        }
    );

    // --- Initialize Simulation ---
    let world = HeadlessWorld::from_config(&config);
    let mut sim = FlockSimulation::new(config)?;
    debug!("Simulation Parameters: {:#?}", sim.params());

    // --- Simulation Loop ---
    let dt = world.dt;
    let total_steps = args
        .steps
        .unwrap_or_else(|| (sim.config().timing.total_time_s / dt).ceil() as u64);
    let mut record_interval_steps = (sim.config().timing.record_interval_s.max(0.0) / dt).round() as u64;
    if record_interval_steps == 0 {
        warn!(
            "Record interval ({:.3} s) is smaller than the frame delta ({:.3} s). Recording every frame.",
            sim.config().timing.record_interval_s,
            dt
        );
        record_interval_steps = 1;
    }
    info!("Recording snapshot every {} frames ({:.2} s).", record_interval_steps, record_interval_steps as f32 * dt);

    info!("Running {} frames...", total_steps);
    let start_time = Instant::now();
    let mut previous_print_time = start_time;

    sim.record_snapshot();

    for step in 0..total_steps {
        let step_start_time = Instant::now();
        let inputs = world.inputs_at(sim.elapsed());
        sim.step(&inputs);
        let step_duration = step_start_time.elapsed();

        let current_time = Instant::now();
        let should_print_status = current_time.duration_since(previous_print_time).as_secs_f64() >= 5.0;
        let is_record_step = (step + 1) % record_interval_steps == 0;
        let is_last_step = step + 1 == total_steps;

        if is_record_step || is_last_step {
            sim.record_snapshot();
        }

        if should_print_status || is_last_step {
            let last = sim.recorded_snapshots().last();
            info!(
                "Frame [{}/{}] ({:.2} s) | Fleeing: {} | Seeking: {} | Step Time: {:6.2} ms | Elapsed: {:.2} s",
                step + 1,
                total_steps,
                sim.elapsed(),
                last.map_or(0, |s| s.fleeing),
                last.map_or(0, |s| s.seeking),
                step_duration.as_secs_f64() * 1000.0,
                start_time.elapsed().as_secs_f64()
            );
            previous_print_time = current_time;
        } else {
            trace!(
                "Frame [{}/{}] completed in {:.2} ms",
                step + 1,
                total_steps,
                step_duration.as_secs_f64() * 1000.0
            );
        }
    }

    let total_duration = start_time.elapsed();
    info!("Simulation finished in {:.3} seconds.", total_duration.as_secs_f64());

    // --- Save Recorded Data ---
    let output = sim.config().output.clone();
    if output.save_stats {
        let format = output.format.as_deref().unwrap_or("json");
        if let Err(e) = write_snapshots(&output.base_filename, format, sim.recorded_snapshots()) {
            error!("Error saving snapshots: {:#}", e);
        }
    } else {
        info!("Skipping saving snapshots as per config (save_stats is false).");
    }

    if output.save_positions {
        let filename = format!("{}_final_positions.csv", output.base_filename);
        let mut writer = csv::Writer::from_path(&filename)
            .with_context(|| format!("Failed to create '{}'", filename))?;
        writer.write_record(["x", "y"])?;
        for (x, y) in sim.final_positions() {
            writer.write_record(&[format!("{:.4}", x), format!("{:.4}", y)])?;
        }
        writer.flush()?;
        info!("Final positions saved to {}", filename);
    } else {
        info!("Skipping saving final positions as per config.");
    }

    info!("Simulation Complete.");
    Ok(())
}

/// Writes every recorded snapshot in the requested format.
fn write_snapshots(base_filename: &str, format: &str, snapshots: &[Snapshot]) -> Result<()> {
    let format = match format {
        "json" | "bincode" | "messagepack" => format,
        other => {
            error!("Unknown output format: {}. Using JSON instead.", other);
            "json"
        }
    };

    let extension = match format {
        "bincode" => "bin",
        "messagepack" => "msgpack",
        _ => "json",
    };
    let filename = format!("{}_snapshots.{}", base_filename, extension);
    let file = File::create(&filename).with_context(|| format!("Failed to create '{}'", filename))?;
    let mut writer = BufWriter::new(file);

    match format {
        "bincode" => bincode::serialize_into(&mut writer, snapshots).context("bincode serialization failed")?,
        "messagepack" => rmp_serde::encode::write(&mut writer, snapshots).context("MessagePack serialization failed")?,
        _ => serde_json::to_writer(&mut writer, snapshots).context("JSON serialization failed")?,
    }
    writer.flush()?;

    info!("{} snapshots saved to {} ({} format)", snapshots.len(), filename, format);
    Ok(())
}
