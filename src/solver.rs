mod astar;
mod successor;

pub use astar::JointAStar;
pub use successor::Successors;

use std::time::Duration;

use crate::common::Solution;
use crate::stat::Stats;

/// Result of one search. Running out of budget is kept apart from proving
/// that no plan exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved(Solution),
    NoSolution,
    BudgetExhausted,
}

impl SearchOutcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}

/// Optional caps on a single search; `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_expansions: Option<usize>,
    pub time_limit: Option<Duration>,
}

pub trait Solver {
    fn solve(&mut self) -> SearchOutcome;

    fn stats(&self) -> &Stats;
}
