use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::sim_params::SimParams;
use std::path::Path;

// Dimensions of the wrap-around world
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WorldConfig {
    #[serde(default = "default_world_width")]
    pub width: f32,
    #[serde(default = "default_world_height")]
    pub height: f32,
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    /// Fixed frame delta handed to every step, in seconds.
    #[serde(default = "default_dt_s")]
    pub dt_s: f32,
    #[serde(default = "default_total_time_s")]
    pub total_time_s: f32,
    #[serde(default = "default_record_interval_s")]
    pub record_interval_s: f32,
}

// Initial flock population
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct FlockConfig {
    #[serde(default = "default_flock_count")]
    pub count: u32,
    #[serde(default = "default_flock_max_speed")]
    pub max_speed: f32,
    /// No flock member is placed closer than this to the predator's start.
    #[serde(default = "default_safe_radius")]
    pub safe_radius: f32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PredatorConfig {
    #[serde(default = "default_predator_max_speed")]
    pub max_speed: f32,
    // World centre when unset
    #[serde(default)]
    pub start_x: Option<f32>,
    #[serde(default)]
    pub start_y: Option<f32>,
}

// Force limits and neighbourhood radii shared by every steering rule
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SteeringConfig {
    #[serde(default = "default_max_force")]
    pub max_force: f32,
    #[serde(default = "default_separation_radius")]
    pub separation_radius: f32,
    /// Also used as the cohesion radius.
    #[serde(default = "default_alignment_radius")]
    pub alignment_radius: f32,
    #[serde(default = "default_fear_radius")]
    pub fear_radius: f32,
    #[serde(default = "default_seek_radius")]
    pub seek_radius: f32,
    #[serde(default = "default_hunt_distance")]
    pub hunt_distance: f32,
    /// Wander force magnitude as a fraction of the predator's max speed.
    #[serde(default = "default_wander_factor")]
    pub wander_factor: f32,
    /// Rescale velocity to max speed after each force application.
    #[serde(default)]
    pub clamp_speed: bool,
}

// Blend weights applied by the per-agent force selection
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WeightsConfig {
    #[serde(default = "default_flee_weight")]
    pub flee: f32,
    #[serde(default = "default_flee_separation_weight")]
    pub flee_separation: f32,
    #[serde(default = "default_separation_weight")]
    pub separation: f32,
    #[serde(default = "default_alignment_weight")]
    pub alignment: f32,
    #[serde(default = "default_cohesion_weight")]
    pub cohesion: f32,
    #[serde(default = "default_seek_weight")]
    pub seek: f32,
}

/// A window of simulated time during which the pointer is held at `(x, y)`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub start_s: f32,
    pub end_s: f32,
    pub x: f32,
    pub y: f32,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct PointerConfig {
    #[serde(default)]
    pub events: Vec<PointerEvent>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RunConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Compute per-agent forces on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default)]
    pub debug: bool,
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_positions: bool,
    pub save_stats: bool,
    #[serde(default)]
    pub save_positions_in_snapshot: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

// Main simulation configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub flock: FlockConfig,
    #[serde(default)]
    pub predator: PredatorConfig,
    #[serde(default)]
    pub steering: SteeringConfig,
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub pointer: PointerConfig,
    #[serde(default)]
    pub run: RunConfig,
    pub output: OutputConfig,
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))?;

        Ok(config)
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would break the steering contracts.
    pub fn validate(&self) -> Result<()> {
        if self.world.width <= 0.0 || self.world.height <= 0.0 {
            anyhow::bail!("world width and height must be positive.");
        }
        if self.timing.dt_s <= 0.0 {
            anyhow::bail!("dt_s must be positive.");
        }
        if self.timing.total_time_s < 0.0 {
            anyhow::bail!("total_time_s must not be negative.");
        }
        if self.flock.count == 0 {
            anyhow::bail!("flock count must be greater than 0.");
        }
        if self.flock.max_speed <= 0.0 || self.predator.max_speed <= 0.0 {
            anyhow::bail!("max_speed must be positive for flock and predator.");
        }
        if self.flock.safe_radius < 0.0 {
            anyhow::bail!("safe_radius must not be negative.");
        }
        let s = &self.steering;
        if s.max_force <= 0.0 {
            anyhow::bail!("max_force must be positive.");
        }
        let radii = [
            ("separation_radius", s.separation_radius),
            ("alignment_radius", s.alignment_radius),
            ("fear_radius", s.fear_radius),
            ("seek_radius", s.seek_radius),
            ("hunt_distance", s.hunt_distance),
        ];
        for (name, radius) in radii {
            if radius <= 0.0 {
                anyhow::bail!("{} must be positive (got {}).", name, radius);
            }
        }
        for event in &self.pointer.events {
            if event.end_s < event.start_s {
                anyhow::bail!(
                    "pointer event ends before it starts ({} < {}).",
                    event.end_s,
                    event.start_s
                );
            }
        }
        Ok(())
    }

    /// Predator start position; the world centre unless overridden.
    pub fn predator_start(&self) -> (f32, f32) {
        (
            self.predator.start_x.unwrap_or(self.world.width / 2.0),
            self.predator.start_y.unwrap_or(self.world.height / 2.0),
        )
    }

    /// Converts the configuration into simulation parameters used at runtime.
    pub fn get_sim_params(&self) -> SimParams {
        let s = &self.steering;
        let w = &self.weights;

        SimParams {
            max_force: s.max_force,
            max_force_sq: s.max_force * s.max_force,
            separation_radius: s.separation_radius,
            alignment_radius_sq: s.alignment_radius * s.alignment_radius,
            fear_radius_sq: s.fear_radius * s.fear_radius,
            seek_radius_sq: s.seek_radius * s.seek_radius,
            hunt_distance_sq: s.hunt_distance * s.hunt_distance,
            wander_factor: s.wander_factor,
            clamp_speed: s.clamp_speed,
            flee_weight: w.flee,
            flee_separation_weight: w.flee_separation,
            separation_weight: w.separation,
            alignment_weight: w.alignment,
            cohesion_weight: w.cohesion,
            seek_weight: w.seek,
            parallel: self.run.parallel,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig { width: default_world_width(), height: default_world_height() }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            dt_s: default_dt_s(),
            total_time_s: default_total_time_s(),
            record_interval_s: default_record_interval_s(),
        }
    }
}

impl Default for FlockConfig {
    fn default() -> Self {
        FlockConfig {
            count: default_flock_count(),
            max_speed: default_flock_max_speed(),
            safe_radius: default_safe_radius(),
        }
    }
}

impl Default for PredatorConfig {
    fn default() -> Self {
        PredatorConfig { max_speed: default_predator_max_speed(), start_x: None, start_y: None }
    }
}

impl Default for SteeringConfig {
    fn default() -> Self {
        SteeringConfig {
            max_force: default_max_force(),
            separation_radius: default_separation_radius(),
            alignment_radius: default_alignment_radius(),
            fear_radius: default_fear_radius(),
            seek_radius: default_seek_radius(),
            hunt_distance: default_hunt_distance(),
            wander_factor: default_wander_factor(),
            clamp_speed: false,
        }
    }
}

impl Default for WeightsConfig {
    fn default() -> Self {
        WeightsConfig {
            flee: default_flee_weight(),
            flee_separation: default_flee_separation_weight(),
            separation: default_separation_weight(),
            alignment: default_alignment_weight(),
            cohesion: default_cohesion_weight(),
            seek: default_seek_weight(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig { seed: default_seed(), parallel: default_parallel(), debug: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: "flock".to_string(),
            save_positions: false,
            save_stats: false,
            save_positions_in_snapshot: false,
            format: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            world: WorldConfig::default(),
            timing: TimingConfig::default(),
            flock: FlockConfig::default(),
            predator: PredatorConfig::default(),
            steering: SteeringConfig::default(),
            weights: WeightsConfig::default(),
            pointer: PointerConfig::default(),
            run: RunConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn default_world_width() -> f32 { 1280.0 }
fn default_world_height() -> f32 { 720.0 }
fn default_dt_s() -> f32 { 1.0 / 60.0 }
fn default_total_time_s() -> f32 { 60.0 }
fn default_record_interval_s() -> f32 { 1.0 }
fn default_flock_count() -> u32 { 500 }
fn default_flock_max_speed() -> f32 { 4.0 }
fn default_safe_radius() -> f32 { 100.0 }
fn default_predator_max_speed() -> f32 { 5.0 }
fn default_max_force() -> f32 { 0.1 }
fn default_separation_radius() -> f32 { 25.0 }
fn default_alignment_radius() -> f32 { 50.0 }
fn default_fear_radius() -> f32 { 60.0 }
fn default_seek_radius() -> f32 { 350.0 }
fn default_hunt_distance() -> f32 { 300.0 }
fn default_wander_factor() -> f32 { 0.5 }
fn default_flee_weight() -> f32 { 5.0 }
fn default_flee_separation_weight() -> f32 { 2.0 }
fn default_separation_weight() -> f32 { 1.5 }
fn default_alignment_weight() -> f32 { 1.0 }
fn default_cohesion_weight() -> f32 { 0.8 }
fn default_seek_weight() -> f32 { 2.5 }
fn default_seed() -> u64 { 42 }
fn default_parallel() -> bool { true }
