//! Steering rules. Each rule is a pure function of one agent, its read-only
//! surroundings and the shared parameters, and returns a force to add to the
//! agent's velocity.

use crate::agent::Agent;
use flocking_common::{SimParams, Vec2};

/// Squared length below which a target vector or force counts as zero.
pub const NEAR_ZERO_SQ: f32 = 0.001;
/// Squared distance at which a seeking agent has arrived.
pub const ARRIVAL_DISTANCE_SQ: f32 = 1.0;

/// Force turning the agent's velocity toward `target` at full speed, capped at `max_force`.
pub fn steer_towards(agent: &Agent, target: Vec2, params: &SimParams) -> Vec2 {
    if target.length_squared() < NEAR_ZERO_SQ {
        return Vec2::ZERO;
    }

    let desired = target.normalize_or_zero() * agent.max_speed;
    let steer = desired - agent.velocity;

    if steer.length_squared() > params.max_force_sq {
        steer.normalize_or_zero() * params.max_force
    } else {
        steer
    }
}

/// Pushes away from neighbours closer than the separation radius, nearer ones harder.
///
/// `agent` is skipped by address, so it must be borrowed from `flock` to be excluded;
/// another agent sharing its position still counts as a neighbour.
pub fn separation(agent: &Agent, flock: &[Agent], params: &SimParams) -> Vec2 {
    let mut steering = Vec2::ZERO;
    let mut count = 0u32;

    for other in flock {
        if std::ptr::eq(other, agent) {
            continue;
        }

        let diff = agent.position - other.position;
        let distance = diff.length();

        if distance < params.separation_radius {
            if distance > 0.0 {
                steering += diff.normalize_or_zero() / distance;
            }
            count += 1;
        }
    }

    if count > 0 {
        steering /= count as f32;
    }
    steer_towards(agent, steering, params)
}

/// Matches the average velocity of neighbours within the alignment radius.
pub fn alignment(agent: &Agent, flock: &[Agent], params: &SimParams) -> Vec2 {
    let mut steering = Vec2::ZERO;
    let mut count = 0u32;

    for other in neighbours(agent, flock, params.alignment_radius_sq) {
        steering += other.velocity;
        count += 1;
    }

    if count > 0 {
        steering /= count as f32;
    }
    steer_towards(agent, steering, params)
}

/// Moves toward the centre of mass of neighbours within the alignment radius.
pub fn cohesion(agent: &Agent, flock: &[Agent], params: &SimParams) -> Vec2 {
    let mut center_of_mass = Vec2::ZERO;
    let mut count = 0u32;

    for other in neighbours(agent, flock, params.alignment_radius_sq) {
        center_of_mass += other.position;
        count += 1;
    }

    if count == 0 {
        return Vec2::ZERO;
    }
    center_of_mass /= count as f32;
    steer_towards(agent, center_of_mass - agent.position, params)
}

/// Runs from a predator inside the fear radius.
///
/// Unlike the other rules this force is not capped at `max_force`, so a
/// panicking agent can turn much faster than a flocking one.
pub fn flee(agent: &Agent, predator_position: Vec2, params: &SimParams) -> Vec2 {
    let diff = agent.position - predator_position;
    let distance_sq = diff.length_squared();

    if distance_sq > params.fear_radius_sq || distance_sq < NEAR_ZERO_SQ {
        return Vec2::ZERO;
    }

    diff.normalize_or_zero() * agent.max_speed - agent.velocity
}

/// Steers toward `target` unless it is already reached or beyond the seek radius.
pub fn seek(agent: &Agent, target: Vec2, params: &SimParams) -> Vec2 {
    let diff = target - agent.position;
    let distance_sq = diff.length_squared();

    if distance_sq < ARRIVAL_DISTANCE_SQ || distance_sq > params.seek_radius_sq {
        return Vec2::ZERO;
    }

    steer_towards(agent, diff, params)
}

// Other agents whose squared distance lies strictly inside (NEAR_ZERO_SQ, radius_sq).
fn neighbours<'a>(agent: &'a Agent, flock: &'a [Agent], radius_sq: f32) -> impl Iterator<Item = &'a Agent> + 'a {
    flock.iter().filter(move |other| {
        if std::ptr::eq(*other, agent) {
            return false;
        }
        let distance_sq = agent.position.distance_squared(other.position);
        distance_sq < radius_sq && distance_sq > NEAR_ZERO_SQ
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Behavior;
    use flocking_common::SimulationConfig;

    fn params() -> SimParams {
        SimulationConfig::default().get_sim_params()
    }

    fn boid(x: f32, y: f32, vx: f32, vy: f32) -> Agent {
        Agent::with_velocity(Vec2::new(x, y), Vec2::new(vx, vy), 4.0, Behavior::Flock)
    }

    #[test]
    fn steer_towards_caps_at_max_force() {
        let params = params();
        let agent = boid(0.0, 0.0, 4.0, 0.0);
        for target in [Vec2::new(-1.0, 0.0), Vec2::new(0.0, 7.0), Vec2::new(3.0, -3.0)] {
            let force = steer_towards(&agent, target, &params);
            assert!(force.length() <= params.max_force + 1e-6, "force {:?} too long", force);
        }
    }

    #[test]
    fn steer_towards_ignores_degenerate_target() {
        let agent = boid(0.0, 0.0, 1.0, 1.0);
        assert_eq!(steer_towards(&agent, Vec2::new(0.01, 0.01), &params()), Vec2::ZERO);
    }

    #[test]
    fn steer_towards_returns_small_difference_unclamped() {
        let agent = boid(0.0, 0.0, 3.95, 0.0);
        let force = steer_towards(&agent, Vec2::new(10.0, 0.0), &params());
        assert!((force.x - 0.05).abs() < 1e-5);
        assert_eq!(force.y, 0.0);
    }

    #[test]
    fn rules_are_zero_without_neighbours() {
        let params = params();
        let flock = vec![boid(100.0, 100.0, 1.0, 0.0), boid(300.0, 300.0, 0.0, 1.0)];
        let agent = &flock[0];
        assert_eq!(separation(agent, &flock, &params), Vec2::ZERO);
        assert_eq!(alignment(agent, &flock, &params), Vec2::ZERO);
        assert_eq!(cohesion(agent, &flock, &params), Vec2::ZERO);
    }

    #[test]
    fn separation_pushes_away_from_close_neighbour() {
        let params = params();
        let flock = vec![boid(100.0, 100.0, 0.0, 0.0), boid(110.0, 100.0, 0.0, 0.0)];
        let force = separation(&flock[0], &flock, &params);
        assert!(force.x < 0.0);
        assert!((force.length() - params.max_force).abs() < 1e-5);
    }

    #[test]
    fn separation_counts_a_copy_at_the_same_position() {
        let params = params();
        let flock = vec![boid(100.0, 100.0, 0.0, 0.0)];
        let outsider = flock[0].clone();
        // Coincident neighbour contributes nothing, so the average is zero.
        assert_eq!(separation(&outsider, &flock, &params), Vec2::ZERO);
        // The agent itself is never its own neighbour.
        assert_eq!(separation(&flock[0], &flock, &params), Vec2::ZERO);
    }

    #[test]
    fn separation_weights_neighbours_by_inverse_distance() {
        let params = params();
        let flock = vec![
            boid(100.0, 100.0, 0.0, 0.0),
            boid(105.0, 100.0, 0.0, 0.0),
            boid(100.0, 120.0, 0.0, 0.0),
        ];
        // (-1/5, 0) + (0, -1/20): the nearer neighbour pushes four times harder.
        let force = separation(&flock[0], &flock, &params);
        assert!(force.x < 0.0 && force.y < 0.0);
        assert!((force.x / force.y - 4.0).abs() < 1e-4, "force {:?}", force);
        assert!((force.length() - params.max_force).abs() < 1e-5);
    }

    #[test]
    fn separation_averages_over_coincident_neighbours() {
        let params = params();
        // Alone, the neighbour at distance 20 gives an average push of 0.05.
        let pair = vec![boid(100.0, 100.0, 0.0, 0.0), boid(120.0, 100.0, 0.0, 0.0)];
        let force = separation(&pair[0], &pair, &params);
        assert!(force.x < 0.0);
        assert!((force.length() - params.max_force).abs() < 1e-5);

        // A coincident neighbour halves it to 0.025, below the steering threshold.
        let crowded = vec![
            boid(100.0, 100.0, 0.0, 0.0),
            boid(120.0, 100.0, 0.0, 0.0),
            boid(100.0, 100.0, 0.0, 0.0),
        ];
        assert_eq!(separation(&crowded[0], &crowded, &params), Vec2::ZERO);
    }

    #[test]
    fn alignment_turns_toward_neighbour_heading() {
        let params = params();
        let flock = vec![boid(100.0, 100.0, 4.0, 0.0), boid(120.0, 100.0, 0.0, 4.0)];
        let force = alignment(&flock[0], &flock, &params);
        assert!(force.y > 0.0);
        assert!(force.x < 0.0);
    }

    #[test]
    fn alignment_ignores_coincident_neighbour() {
        let params = params();
        let flock = vec![boid(100.0, 100.0, 4.0, 0.0), boid(100.0, 100.0, 0.0, 4.0)];
        assert_eq!(alignment(&flock[0], &flock, &params), Vec2::ZERO);
    }

    #[test]
    fn cohesion_pulls_toward_centre_of_mass() {
        let params = params();
        let flock = vec![
            boid(100.0, 100.0, 0.0, 0.0),
            boid(130.0, 100.0, 0.0, 0.0),
            boid(130.0, 120.0, 0.0, 0.0),
        ];
        let force = cohesion(&flock[0], &flock, &params);
        assert!(force.x > 0.0 && force.y > 0.0);
        assert!(force.length() <= params.max_force + 1e-6);
    }

    #[test]
    fn cohesion_radius_is_strict() {
        let params = params();
        let flock = vec![boid(0.0, 0.0, 0.0, 0.0), boid(50.0, 0.0, 0.0, 0.0)];
        assert_eq!(cohesion(&flock[0], &flock, &params), Vec2::ZERO);
    }

    #[test]
    fn flee_points_away_from_predator() {
        let params = params();
        let agent = boid(100.0, 100.0, 0.0, 0.0);
        let predator = Vec2::new(90.0, 95.0);
        let force = flee(&agent, predator, &params);
        assert!(force.dot(agent.position - predator) > 0.0);
        // Not capped at max_force.
        assert!((force.length() - agent.max_speed).abs() < 1e-4);
    }

    #[test]
    fn flee_is_zero_when_far_or_coincident() {
        let params = params();
        let agent = boid(100.0, 100.0, 1.0, 0.0);
        assert_eq!(flee(&agent, Vec2::new(161.0, 100.0), &params), Vec2::ZERO);
        assert_eq!(flee(&agent, Vec2::new(100.02, 100.0), &params), Vec2::ZERO);
    }

    #[test]
    fn seek_respects_arrival_and_range() {
        let params = params();
        let agent = boid(100.0, 100.0, 0.0, 0.0);
        assert_eq!(seek(&agent, Vec2::new(100.5, 100.0), &params), Vec2::ZERO);
        assert_eq!(seek(&agent, Vec2::new(500.0, 100.0), &params), Vec2::ZERO);
        let force = seek(&agent, Vec2::new(300.0, 100.0), &params);
        assert!(force.x > 0.0);
        assert!((force.length() - params.max_force).abs() < 1e-5);
    }
}
