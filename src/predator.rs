use crate::agent::Agent;
use crate::steering::steer_towards;
use flocking_common::{SimParams, Vec2};
use rand::Rng;

/// Pursues the nearest flock member within the hunt distance, or wanders when none is in range.
pub fn hunt<R: Rng + ?Sized>(predator: &Agent, flock: &[Agent], params: &SimParams, rng: &mut R) -> Vec2 {
    match nearest_prey(predator, flock, params) {
        Some(offset) => steer_towards(predator, offset, params),
        None => wander(predator, params, rng),
    }
}

/// Offset from the predator to the closest flock member inside the hunt distance.
pub fn nearest_prey(predator: &Agent, flock: &[Agent], params: &SimParams) -> Option<Vec2> {
    let mut closest_dist_sq = f32::MAX;
    let mut target = None;

    for boid in flock {
        let diff = boid.position - predator.position;
        let dist_sq = diff.length_squared();

        if dist_sq < params.hunt_distance_sq && dist_sq < closest_dist_sq {
            closest_dist_sq = dist_sq;
            target = Some(diff);
        }
    }

    target
}

/// A fresh random push of `max_speed * wander_factor`, independent of previous frames.
pub fn wander<R: Rng + ?Sized>(predator: &Agent, params: &SimParams, rng: &mut R) -> Vec2 {
    let direction = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));

    if direction.length_squared() > 0.0 {
        direction.normalize_or_zero() * (predator.max_speed * params.wander_factor)
    } else {
        Vec2::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Behavior;
    use flocking_common::SimulationConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn predator_at(x: f32, y: f32) -> Agent {
        Agent::with_velocity(Vec2::new(x, y), Vec2::new(5.0, 0.0), 5.0, Behavior::Predator)
    }

    fn boid(x: f32, y: f32) -> Agent {
        Agent::with_velocity(Vec2::new(x, y), Vec2::zero(), 4.0, Behavior::Flock)
    }

    #[test]
    fn nearest_prey_picks_closest_in_range() {
        let params = SimulationConfig::default().get_sim_params();
        let predator = predator_at(500.0, 500.0);
        let flock = vec![boid(700.0, 500.0), boid(500.0, 420.0), boid(100.0, 100.0)];
        assert_eq!(nearest_prey(&predator, &flock, &params), Some(Vec2::new(0.0, -80.0)));
    }

    #[test]
    fn hunt_steers_toward_prey() {
        let params = SimulationConfig::default().get_sim_params();
        let predator = predator_at(500.0, 500.0);
        let flock = vec![boid(500.0, 600.0)];
        let mut rng = StdRng::seed_from_u64(1);
        let force = hunt(&predator, &flock, &params, &mut rng);
        assert!(force.y > 0.0);
        assert!(force.length() <= params.max_force + 1e-6);
    }

    #[test]
    fn hunt_wanders_with_no_prey_in_range() {
        let params = SimulationConfig::default().get_sim_params();
        let predator = predator_at(500.0, 500.0);
        let flock = vec![boid(900.0, 500.0), boid(10.0, 10.0)];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let force = hunt(&predator, &flock, &params, &mut rng);
            assert!((force.length() - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn wander_depends_only_on_rng() {
        let params = SimulationConfig::default().get_sim_params();
        let predator = predator_at(0.0, 0.0);
        let a = wander(&predator, &params, &mut StdRng::seed_from_u64(99));
        let b = wander(&predator, &params, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }
}
