//! What the surrounding application feeds into each frame. A windowed front
//! end would fill `WorldInputs` from its clock and mouse; the headless runner
//! uses a fixed timestep and a scripted pointer.

use flocking_common::{PointerEvent, SimulationConfig, Vec2};

/// Inputs for a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldInputs {
    /// Seconds since the previous frame.
    pub dt: f32,
    pub width: f32,
    pub height: f32,
    /// Pointer position while it is held down.
    pub pointer: Option<Vec2>,
    pub debug: bool,
}

/// True if `point` lies in the closed rectangle `[0,width] × [0,height]`.
pub fn pointer_in_bounds(point: Vec2, width: f32, height: f32) -> bool {
    point.x >= 0.0 && point.x <= width && point.y >= 0.0 && point.y <= height
}

/// Timed pointer holds replayed against simulated time.
#[derive(Debug, Clone, Default)]
pub struct PointerScript {
    events: Vec<PointerEvent>,
}

impl PointerScript {
    pub fn new(events: Vec<PointerEvent>) -> Self {
        Self { events }
    }

    /// Pointer position at `time`; the first event covering `[start_s, end_s)` wins.
    pub fn target_at(&self, time: f32) -> Option<Vec2> {
        self.events
            .iter()
            .find(|event| event.start_s <= time && time < event.end_s)
            .map(|event| Vec2::new(event.x, event.y))
    }
}

/// Fixed-timestep stand-in for a window and its input devices.
#[derive(Debug, Clone)]
pub struct HeadlessWorld {
    pub width: f32,
    pub height: f32,
    pub dt: f32,
    pub debug: bool,
    pointer: PointerScript,
}

impl HeadlessWorld {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            width: config.world.width,
            height: config.world.height,
            dt: config.timing.dt_s,
            debug: config.run.debug,
            pointer: PointerScript::new(config.pointer.events.clone()),
        }
    }

    pub fn inputs_at(&self, time: f32) -> WorldInputs {
        WorldInputs {
            dt: self.dt,
            width: self.width,
            height: self.height,
            pointer: self.pointer.target_at(time),
            debug: self.debug,
        }
    }
}
