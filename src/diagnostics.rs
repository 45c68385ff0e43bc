use crate::agent::Agent;
use flocking_common::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Steering state a flock member was in for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    /// Placeholder before any frame has run.
    Idle,
    Flee,
    Seek,
    Flock,
}

impl AgentState {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentState::Idle => "IDLE",
            AgentState::Flee => "FLEE",
            AgentState::Seek => "SEEK",
            AgentState::Flock => "FLOCK",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The blended force chosen for one agent and the state that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceRecord {
    pub force: Vec2,
    pub state: AgentState,
}

impl Default for ForceRecord {
    fn default() -> Self {
        ForceRecord { force: Vec2::ZERO, state: AgentState::Idle }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub fleeing: u32,
    pub seeking: u32,
    pub flocking: u32,
}

impl StateCounts {
    pub fn from_records(records: &[ForceRecord]) -> Self {
        let mut counts = StateCounts::default();
        for record in records {
            match record.state {
                AgentState::Flee => counts.fleeing += 1,
                AgentState::Seek => counts.seeking += 1,
                AgentState::Flock => counts.flocking += 1,
                AgentState::Idle => {}
            }
        }
        counts
    }
}

/// Mean and maximum speed over the flock.
pub fn speed_stats(flock: &[Agent]) -> (f32, f32) {
    if flock.is_empty() {
        return (0.0, 0.0);
    }
    let mut total = 0.0;
    let mut max = 0.0f32;
    for agent in flock {
        let speed = agent.velocity.length();
        total += speed;
        max = max.max(speed);
    }
    (total / flock.len() as f32, max)
}

/// Reports every agent's force and state for one frame at debug level.
pub fn log_frame(frame: u64, flock: &[Agent], records: &[ForceRecord]) {
    for (index, (agent, record)) in flock.iter().zip(records).enumerate() {
        debug!(
            "frame {} agent {} [{}] pos=({:.1}, {:.1}) force=({:.4}, {:.4})",
            frame,
            index,
            record.state,
            agent.position.x,
            agent.position.y,
            record.force.x,
            record.force.y
        );
    }
}
