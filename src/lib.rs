//! Predator/prey flocking: steering rules, the per-frame step, and the inputs
//! a front end supplies to drive it.

pub mod agent;
pub mod diagnostics;
pub mod predator;
pub mod simulation;
pub mod steering;
pub mod world;

pub use agent::{Agent, Behavior};
pub use diagnostics::{AgentState, ForceRecord, StateCounts};
pub use simulation::{create_flock, select_force, step_simulation, FlockSimulation};
pub use world::{HeadlessWorld, PointerScript, WorldInputs};
