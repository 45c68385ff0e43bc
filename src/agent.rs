use flocking_common::{vec_to_angle, AgentPose, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Which rule set drives an agent. Chosen once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    Flock,
    Predator,
}

/// State shared by flock members and the predator.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub position: Vec2,
    pub velocity: Vec2,
    pub max_speed: f32,
    /// Half of `max_speed`. Carried for callers; no steering rule reads it.
    pub min_speed: f32,
    heading: f32,
    behavior: Behavior,
}

impl Agent {
    /// Creates an agent moving at `max_speed` in a direction drawn uniformly from `[-1,1]²`.
    pub fn new<R: Rng + ?Sized>(position: Vec2, max_speed: f32, behavior: Behavior, rng: &mut R) -> Self {
        let direction = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
        let velocity = if direction.length_squared() > 0.001 {
            direction.normalize_or_zero() * max_speed
        } else {
            Vec2::new(max_speed, 0.0)
        };
        Self::with_velocity(position, velocity, max_speed, behavior)
    }

    pub fn with_velocity(position: Vec2, velocity: Vec2, max_speed: f32, behavior: Behavior) -> Self {
        Self {
            position,
            velocity,
            max_speed,
            min_speed: max_speed * 0.5,
            heading: vec_to_angle(velocity),
            behavior,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Angle of the velocity at the last update, in radians.
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn pose(&self) -> AgentPose {
        AgentPose { x: self.position.x, y: self.position.y, heading: self.heading }
    }

    /// Adds `force` to the velocity. The result is not limited to `max_speed`.
    pub fn apply_force(&mut self, force: Vec2) {
        self.velocity += force;
    }

    /// Rescales the velocity down to `max_speed` when it is faster.
    pub fn limit_speed(&mut self) {
        self.velocity = self.velocity.clamp_length(self.max_speed);
    }

    /// Moves the agent by `velocity * dt` and wraps it back into `[0,width) × [0,height)`.
    ///
    /// The wrap is a single add or subtract per axis, so a frame's displacement
    /// must stay below one world dimension.
    pub fn update(&mut self, dt: f32, width: f32, height: f32) {
        self.position += self.velocity * dt;
        self.position.x = wrap_axis(self.position.x, width);
        self.position.y = wrap_axis(self.position.y, height);

        self.heading = vec_to_angle(self.velocity);
    }
}

fn wrap_axis(value: f32, bound: f32) -> f32 {
    let wrapped = if value >= bound {
        value - bound
    } else if value < 0.0 {
        value + bound
    } else {
        value
    };
    // bound + tiny negative rounds to bound in f32
    if wrapped >= bound {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn new_agent_moves_at_max_speed() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let agent = Agent::new(Vec2::new(10.0, 10.0), 4.0, Behavior::Flock, &mut rng);
            assert!((agent.velocity.length() - 4.0).abs() < 1e-4);
            assert_eq!(agent.min_speed, 2.0);
        }
    }

    #[test]
    fn update_advances_by_velocity_times_dt() {
        let mut agent = Agent::with_velocity(Vec2::new(100.0, 100.0), Vec2::new(3.0, -2.0), 4.0, Behavior::Flock);
        agent.update(0.5, 1280.0, 720.0);
        assert_eq!(agent.position, Vec2::new(101.5, 99.0));
        assert!((agent.heading() - (-2.0f32).atan2(3.0)).abs() < 1e-6);
    }

    #[test]
    fn update_wraps_past_upper_bound() {
        let mut agent = Agent::with_velocity(Vec2::new(1275.0, 10.0), Vec2::new(10.0, 0.0), 4.0, Behavior::Flock);
        agent.update(1.0, 1280.0, 720.0);
        assert!((agent.position.x - 5.0).abs() < 1e-4);
        assert_eq!(agent.position.y, 10.0);
    }

    #[test]
    fn update_wraps_below_zero() {
        let mut agent = Agent::with_velocity(Vec2::new(2.0, 1.0), Vec2::new(-5.0, -4.0), 4.0, Behavior::Flock);
        agent.update(1.0, 1280.0, 720.0);
        assert!((agent.position.x - 1277.0).abs() < 1e-4);
        assert!((agent.position.y - 717.0).abs() < 1e-4);
    }

    #[test]
    fn wrap_never_lands_on_the_upper_bound() {
        assert_eq!(wrap_axis(-1e-7, 1280.0), 0.0);
        assert_eq!(wrap_axis(1280.0, 1280.0), 0.0);
        assert_eq!(wrap_axis(-3.0, 1280.0), 1277.0);
    }

    #[test]
    fn apply_force_does_not_clamp_speed() {
        let mut agent = Agent::with_velocity(Vec2::zero(), Vec2::new(4.0, 0.0), 4.0, Behavior::Flock);
        agent.apply_force(Vec2::new(3.0, 0.0));
        assert_eq!(agent.velocity, Vec2::new(7.0, 0.0));
        agent.limit_speed();
        assert!((agent.velocity.length() - 4.0).abs() < 1e-5);
    }
}
