use std::f32::consts::PI;

use glam::Vec2;
use tracing::{debug, trace};

use crate::agent::Agent;
use crate::math_helpers::distance_sq;
use crate::options::{FlockOptions, PlaneSize, Tunable, Tunables};

/// Radius of the neighbourhood handed to each agent, independent of the rule distances
pub const NEIGHBOUR_DISTANCE: f32 = 100.;

/// A fixed population of agents, with the canonical copy of the tunables they share.
///
/// Neighbours are found with an O(N^2) scan, which is plenty for the tens of
/// agents a flock is meant to hold.
#[derive(Debug, Clone)]
pub struct Flock {
    agents: Vec<Agent>,
    size: usize,
    plane: PlaneSize,
    wrap: bool,
    tunables: Tunables,
    neighbour_distance: f32,
    neighbour_distance_sq: f32,
}

impl Flock {
    pub fn new(options: &FlockOptions) -> Self {
        let agents = get_agents(options.size, options.plane, options.wrap, options.tunables);

        debug!(
            size = options.size,
            width = options.plane.width,
            height = options.plane.height,
            wrap = options.wrap,
            "flock spawned"
        );

        Flock {
            agents,
            size: options.size,
            plane: options.plane,
            wrap: options.wrap,
            tunables: options.tunables,
            neighbour_distance: NEIGHBOUR_DISTANCE,
            neighbour_distance_sq: NEIGHBOUR_DISTANCE.powi(2),
        }
    }

    /// Advances every agent by one step.
    ///
    /// Agents move in place and in order, so agent `i` already sees where the
    /// agents before it ended up during this very step.
    pub fn update(&mut self) {
        let neighbour_distance_sq = self.neighbour_distance_sq;

        for i_cur in 0..self.agents.len() {
            let (before, rest) = self.agents.split_at_mut(i_cur);
            if let Some((current, after)) = rest.split_first_mut() {
                let position = current.position;
                let neighbours: Vec<&Agent> = before
                    .iter()
                    .chain(after.iter())
                    .filter(|other| distance_sq(other.position, position) < neighbour_distance_sq)
                    .collect();

                current.update(&neighbours);
            }
        }
    }

    /// Neighbours of the agent at `index` as the next update would see them
    pub fn neighbours_of(&self, index: usize) -> Vec<&Agent> {
        let Some(current) = self.agents.get(index) else {
            return Vec::new();
        };

        self.agents
            .iter()
            .enumerate()
            .filter(|(j, other)| {
                *j != index
                    && distance_sq(other.position, current.position) < self.neighbour_distance_sq
            })
            .map(|(_, other)| other)
            .collect()
    }

    /// Updates one tunable and writes it through to every agent.
    ///
    /// Returns false, touching nothing, when the value is unchanged (exact comparison).
    pub fn set_tunable(&mut self, tunable: Tunable, value: f32) -> bool {
        if self.tunables.get(tunable) == value {
            return false;
        }

        trace!(%tunable, value, "propagating to {} agents", self.agents.len());

        self.tunables.set(tunable, value);
        for agent in self.agents.iter_mut() {
            agent.set_tunable(tunable, value);
        }

        true
    }

    pub fn set_separation_strength(&mut self, strength: f32) -> bool {
        self.set_tunable(Tunable::SeparationStrength, strength)
    }

    pub fn set_separation_distance(&mut self, distance: f32) -> bool {
        self.set_tunable(Tunable::SeparationDistance, distance)
    }

    pub fn set_alignment_strength(&mut self, strength: f32) -> bool {
        self.set_tunable(Tunable::AlignmentStrength, strength)
    }

    pub fn set_alignment_distance(&mut self, distance: f32) -> bool {
        self.set_tunable(Tunable::AlignmentDistance, distance)
    }

    pub fn set_cohesion_strength(&mut self, strength: f32) -> bool {
        self.set_tunable(Tunable::CohesionStrength, strength)
    }

    pub fn set_cohesion_distance(&mut self, distance: f32) -> bool {
        self.set_tunable(Tunable::CohesionDistance, distance)
    }

    pub fn separation_strength(&self) -> f32 {
        self.tunables.separation_strength
    }

    pub fn separation_distance(&self) -> f32 {
        self.tunables.separation_distance
    }

    pub fn alignment_strength(&self) -> f32 {
        self.tunables.alignment_strength
    }

    pub fn alignment_distance(&self) -> f32 {
        self.tunables.alignment_distance
    }

    pub fn cohesion_strength(&self) -> f32 {
        self.tunables.cohesion_strength
    }

    pub fn cohesion_distance(&self) -> f32 {
        self.tunables.cohesion_distance
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn plane(&self) -> PlaneSize {
        self.plane
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    pub fn neighbour_distance(&self) -> f32 {
        self.neighbour_distance
    }

    /// Spawns the same number of agents again from the centre, keeping the current tunables
    pub fn restart(&mut self) {
        debug!(size = self.size, "flock restarted");
        self.agents = get_agents(self.size, self.plane, self.wrap, self.tunables);
    }
}

fn get_agents(size: usize, plane: PlaneSize, wrap: bool, tunables: Tunables) -> Vec<Agent> {
    (0..size)
        .map(|id| get_agent(id, size, plane, wrap, tunables))
        .collect()
}

/// Agents start in the centre, headings evenly spread over a full circle so the flock bursts outwards
fn get_agent(id: usize, size: usize, plane: PlaneSize, wrap: bool, tunables: Tunables) -> Agent {
    let angle = (id as f32 / size as f32) * 2. * PI;

    Agent::new(id, plane.center(), plane, wrap, tunables)
        .with_velocity(Vec2::new(angle.cos(), angle.sin()))
}
