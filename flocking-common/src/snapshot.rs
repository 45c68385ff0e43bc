use serde::{Serialize, Deserialize};

/// Position and heading of one agent, as handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentPose {
    pub x: f32,
    pub y: f32,
    /// Velocity angle in radians.
    pub heading: f32,
}

/// A snapshot of the flock and predator at a specific time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulated time in seconds.
    pub time: f32,
    /// Number of completed frames.
    pub frame: u64,
    pub flock_size: u32,
    /// Agents in each steering state during the last frame.
    pub fleeing: u32,
    pub seeking: u32,
    pub flocking: u32,
    /// Mean and max flock speed; velocity is not clamped unless configured.
    pub mean_speed: f32,
    pub max_speed: f32,
    pub predator: AgentPose,
    #[serde(skip_serializing_if = "Option::is_none")] // Don't write "flock": null
    pub flock: Option<Vec<AgentPose>>,
}
