use crate::agent::{Agent, Behavior};
use crate::diagnostics::{self, AgentState, ForceRecord, StateCounts};
use crate::predator::hunt;
use crate::steering::{alignment, cohesion, flee, separation, seek, NEAR_ZERO_SQ};
use crate::world::{pointer_in_bounds, WorldInputs};
use anyhow::Result;
use flocking_common::{SimParams, SimulationConfig, Snapshot, Vec2};
use log::{debug, info, trace};
use rand::distr::Uniform;
use rand::prelude::*;
use rayon::prelude::*;

/// Rejected draws allowed per agent before placement gives up.
const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Owns the flock, the predator and the random source, and advances them frame by frame.
pub struct FlockSimulation {
    config: SimulationConfig,
    params: SimParams,
    flock: Vec<Agent>,
    predator: Agent,
    /// Drives initial placement and the predator's wander.
    rng: StdRng,
    frame: u64,
    elapsed: f32,
    /// Forces and states chosen during the most recent frame.
    last_records: Vec<ForceRecord>,
    recorded_snapshots: Vec<Snapshot>,
}

impl FlockSimulation {
    /// Creates the predator at its start position and places the flock around it.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let params = config.get_sim_params();
        let mut rng = StdRng::seed_from_u64(config.run.seed);

        let (start_x, start_y) = config.predator_start();
        let predator_start = Vec2::new(start_x, start_y);
        let predator = Agent::new(predator_start, config.predator.max_speed, Behavior::Predator, &mut rng);

        let flock = create_flock(
            config.flock.count as usize,
            config.world.width,
            config.world.height,
            predator_start,
            config.flock.safe_radius,
            config.flock.max_speed,
            &mut rng,
        )?;
        info!(
            "Placed {} agents at least {:.1} from the predator at ({:.1}, {:.1}).",
            flock.len(),
            config.flock.safe_radius,
            start_x,
            start_y
        );

        let last_records = vec![ForceRecord::default(); flock.len()];

        Ok(Self {
            config,
            params,
            flock,
            predator,
            rng,
            frame: 0,
            elapsed: 0.0,
            last_records,
            recorded_snapshots: Vec::new(),
        })
    }

    /// Builds a simulation around an existing flock and predator.
    pub fn from_agents(config: SimulationConfig, flock: Vec<Agent>, predator: Agent) -> Result<Self> {
        config.validate()?;
        let params = config.get_sim_params();
        let rng = StdRng::seed_from_u64(config.run.seed);
        let last_records = vec![ForceRecord::default(); flock.len()];
        Ok(Self {
            config,
            params,
            flock,
            predator,
            rng,
            frame: 0,
            elapsed: 0.0,
            last_records,
            recorded_snapshots: Vec::new(),
        })
    }

    /// Advances the flock and predator by one frame.
    pub fn step(&mut self, inputs: &WorldInputs) -> &[ForceRecord] {
        self.last_records = step_simulation(
            &mut self.flock,
            &mut self.predator,
            inputs.dt,
            inputs.width,
            inputs.height,
            inputs.pointer,
            &self.params,
            &mut self.rng,
        );

        if inputs.debug {
            diagnostics::log_frame(self.frame, &self.flock, &self.last_records);
        }

        self.frame += 1;
        self.elapsed += inputs.dt.max(0.0);
        &self.last_records
    }

    /// Stores a summary of the current state for later export.
    pub fn record_snapshot(&mut self) {
        let counts = StateCounts::from_records(&self.last_records);
        let (mean_speed, max_speed) = diagnostics::speed_stats(&self.flock);

        let flock_poses = if self.config.output.save_positions_in_snapshot {
            Some(self.flock.iter().map(Agent::pose).collect())
        } else {
            None
        };

        debug!(
            "Snapshot t={:.2}s: flee={} seek={} flock={} mean_speed={:.3} max_speed={:.3}",
            self.elapsed, counts.fleeing, counts.seeking, counts.flocking, mean_speed, max_speed
        );

        self.recorded_snapshots.push(Snapshot {
            time: self.elapsed,
            frame: self.frame,
            flock_size: self.flock.len() as u32,
            fleeing: counts.fleeing,
            seeking: counts.seeking,
            flocking: counts.flocking,
            mean_speed,
            max_speed,
            predator: self.predator.pose(),
            flock: flock_poses,
        });
    }

    pub fn recorded_snapshots(&self) -> &[Snapshot] {
        &self.recorded_snapshots
    }

    /// Final (x, y) of every flock member, in flock order.
    pub fn final_positions(&self) -> Vec<(f32, f32)> {
        self.flock.iter().map(|a| (a.position.x, a.position.y)).collect()
    }

    pub fn flock(&self) -> &[Agent] {
        &self.flock
    }

    pub fn predator(&self) -> &Agent {
        &self.predator
    }

    pub fn last_records(&self) -> &[ForceRecord] {
        &self.last_records
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds since the start.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Runs one frame: every force is computed from the state at the start of the
/// frame, then the predator and each flock member are moved with the same `dt`.
///
/// Returns the force and state chosen for each flock member, in flock order.
/// A negative `dt` is treated as zero.
#[allow(clippy::too_many_arguments)]
pub fn step_simulation<R: Rng + ?Sized>(
    flock: &mut [Agent],
    predator: &mut Agent,
    dt: f32,
    width: f32,
    height: f32,
    pointer_target: Option<Vec2>,
    params: &SimParams,
    rng: &mut R,
) -> Vec<ForceRecord> {
    debug_assert!(!dt.is_nan(), "frame delta must be a number");
    debug_assert_eq!(predator.behavior(), Behavior::Predator, "predator slot holds a flock agent");
    let dt = dt.max(0.0);
    let pointer_target = pointer_target.filter(|p| pointer_in_bounds(*p, width, height));

    // Read phase: nothing moves until every force is known.
    let predator_force = hunt(predator, flock, params, rng);
    let predator_position = predator.position;
    let snapshot: &[Agent] = flock;
    let records: Vec<ForceRecord> = if params.parallel {
        snapshot
            .par_iter()
            .enumerate()
            .map(|(index, agent)| select_force(index, agent, snapshot, predator_position, pointer_target, params))
            .collect()
    } else {
        snapshot
            .iter()
            .enumerate()
            .map(|(index, agent)| select_force(index, agent, snapshot, predator_position, pointer_target, params))
            .collect()
    };

    // Write phase.
    predator.apply_force(predator_force);
    if params.clamp_speed {
        predator.limit_speed();
    }
    predator.update(dt, width, height);

    for (agent, record) in flock.iter_mut().zip(&records) {
        agent.apply_force(record.force);
        if params.clamp_speed {
            agent.limit_speed();
        }
        agent.update(dt, width, height);
    }

    records
}

/// Picks and blends the steering forces for one flock member.
///
/// Fleeing takes priority over everything but separation; otherwise the agent
/// flocks, adding a seek toward `pointer_target` when one is given. `index` is
/// the agent's position in the flock and only labels trace output.
pub fn select_force(
    index: usize,
    agent: &Agent,
    flock: &[Agent],
    predator_position: Vec2,
    pointer_target: Option<Vec2>,
    params: &SimParams,
) -> ForceRecord {
    let flee_force = flee(agent, predator_position, params);

    if flee_force.length_squared() > NEAR_ZERO_SQ {
        let sep = separation(agent, flock, params);
        trace!("Fleeing: agent {} flee=({:.3}, {:.3})", index, flee_force.x, flee_force.y);
        return ForceRecord {
            force: flee_force * params.flee_weight + sep * params.flee_separation_weight,
            state: AgentState::Flee,
        };
    }

    let sep = separation(agent, flock, params);
    let ali = alignment(agent, flock, params);
    let coh = cohesion(agent, flock, params);
    let flocking = sep * params.separation_weight + ali * params.alignment_weight + coh * params.cohesion_weight;

    match pointer_target {
        Some(target) => ForceRecord {
            force: flocking + seek(agent, target, params) * params.seek_weight,
            state: AgentState::Seek,
        },
        None => ForceRecord { force: flocking, state: AgentState::Flock },
    }
}

/// Places `count` agents uniformly in the world, redrawing any that land within
/// `safe_radius` of `predator_start`.
pub fn create_flock<R: Rng + ?Sized>(
    count: usize,
    world_width: f32,
    world_height: f32,
    predator_start: Vec2,
    safe_radius: f32,
    max_speed: f32,
    rng: &mut R,
) -> Result<Vec<Agent>> {
    if world_width <= 0.0 || world_height <= 0.0 {
        anyhow::bail!("World dimensions must be positive ({} x {}).", world_width, world_height);
    }
    let safe_radius_sq = safe_radius * safe_radius;
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(world_width, 0.0),
        Vec2::new(0.0, world_height),
        Vec2::new(world_width, world_height),
    ];
    if corners.iter().all(|c| c.distance_squared(predator_start) < safe_radius_sq) {
        anyhow::bail!(
            "Safe radius {} around ({}, {}) covers the whole {} x {} world.",
            safe_radius,
            predator_start.x,
            predator_start.y,
            world_width,
            world_height
        );
    }

    let dist_x = Uniform::new(0.0f32, world_width)?;
    let dist_y = Uniform::new(0.0f32, world_height)?;

    let mut flock = Vec::with_capacity(count);
    for index in 0..count {
        let mut attempts = 0;
        let position = loop {
            let candidate = Vec2::new(rng.sample(&dist_x), rng.sample(&dist_y));
            if candidate.distance_squared(predator_start) >= safe_radius_sq {
                break candidate;
            }
            attempts += 1;
            if attempts >= MAX_PLACEMENT_ATTEMPTS {
                anyhow::bail!(
                    "Could not place agent {} outside the safe radius after {} attempts.",
                    index,
                    attempts
                );
            }
        };
        flock.push(Agent::new(position, max_speed, Behavior::Flock, rng));
    }

    Ok(flock)
}
