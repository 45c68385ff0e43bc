use serde::{Deserialize, Serialize};

/// Steering parameters derived from the configuration, read by every rule each frame.
/// Radii that are only compared against squared distances are stored squared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    // Force limits
    pub max_force: f32,
    pub max_force_sq: f32,

    // Neighbourhoods
    pub separation_radius: f32, // compared against true distance
    pub alignment_radius_sq: f32, // alignment and cohesion
    pub fear_radius_sq: f32,
    pub seek_radius_sq: f32,
    pub hunt_distance_sq: f32,

    // Predator
    pub wander_factor: f32,

    pub clamp_speed: bool,

    // Force blend weights
    pub flee_weight: f32,
    pub flee_separation_weight: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    pub seek_weight: f32,

    pub parallel: bool,
}
