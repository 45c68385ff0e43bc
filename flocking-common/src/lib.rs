pub mod config;
pub mod sim_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    FlockConfig, OutputConfig, PointerConfig, PointerEvent, PredatorConfig, RunConfig,
    SimulationConfig, SteeringConfig, TimingConfig, WeightsConfig, WorldConfig,
};
pub use sim_params::SimParams;
pub use snapshot::{AgentPose, Snapshot};
pub use vecmath::{Vec2, vec_to_angle};
