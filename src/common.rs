mod action;
mod state;

pub use action::Action;
pub use state::JointState;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::map::{CellKind, Map};

/// Grid coordinate as `(row, col)`.
pub type Position = (usize, usize);

pub type Path = Vec<Position>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: usize,
    pub start: Position,
    pub goal: Position,
}

/// One joint action per time step; `actions[t][i]` is what agent `i` does at step `t`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub actions: Vec<Vec<Action>>,
}

impl Solution {
    pub fn makespan(&self) -> usize {
        self.actions.len()
    }

    /// Replays the plan from the agents' starts. Each path holds the start
    /// plus one position per time step.
    pub fn paths(&self, agents: &[Agent]) -> Vec<Path> {
        agents
            .iter()
            .enumerate()
            .map(|(index, agent)| {
                let mut path = Vec::with_capacity(self.actions.len() + 1);
                path.push(agent.start);
                let mut current = agent.start;
                for step in &self.actions {
                    // Only unverified plans can step off the grid.
                    current = step[index].apply(current).unwrap_or(current);
                    path.push(current);
                }
                path
            })
            .collect()
    }

    /// Replays the plan step by step and checks every movement and conflict rule.
    pub fn verify(&self, map: &Map, agents: &[Agent]) -> bool {
        let mut positions: Vec<Position> = agents.iter().map(|agent| agent.start).collect();

        for (time_step, step) in self.actions.iter().enumerate() {
            if step.len() != agents.len() {
                debug!("step {time_step} has {} actions for {} agents", step.len(), agents.len());
                return false;
            }

            let mut next = Vec::with_capacity(positions.len());
            for (agent, (&position, &action)) in positions.iter().zip(step).enumerate() {
                if action == Action::Wait && map.kind_at(position.0, position.1) == Some(CellKind::ForcedMovement) {
                    debug!("agent {agent} waits on forced-movement cell {position:?} at step {time_step}");
                    return false;
                }
                match action.apply(position) {
                    Some(target) if map.is_traversable(target.0, target.1) => next.push(target),
                    _ => {
                        debug!("agent {agent} leaves the traversable grid at step {time_step}");
                        return false;
                    }
                }
            }

            // Vertex conflict.
            let occupied: HashSet<&Position> = next.iter().collect();
            if occupied.len() != next.len() {
                debug!("vertex conflict at step {time_step}: {next:?}");
                return false;
            }

            // Swap conflict.
            for i in 0..next.len() {
                for j in (i + 1)..next.len() {
                    if next[i] == positions[j] && next[j] == positions[i] {
                        debug!("agents {i} and {j} swap at step {time_step}");
                        return false;
                    }
                }
            }

            positions = next;
        }

        positions
            .iter()
            .zip(agents)
            .all(|(position, agent)| *position == agent.goal)
    }
}
