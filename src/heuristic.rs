use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::{JointState, Position};

/// Per-agent distance estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Manhattan,
    Euclidean,
}

impl Metric {
    /// Maps the command-line selector (1 = Manhattan, 2 = Euclidean).
    pub fn from_selector(selector: u8) -> Option<Self> {
        match selector {
            1 => Some(Metric::Manhattan),
            2 => Some(Metric::Euclidean),
            _ => None,
        }
    }

    pub fn selector(self) -> u8 {
        match self {
            Metric::Manhattan => 1,
            Metric::Euclidean => 2,
        }
    }

    pub fn distance(self, from: Position, to: Position) -> f64 {
        let dr = from.0.abs_diff(to.0) as f64;
        let dc = from.1.abs_diff(to.1) as f64;
        match self {
            Metric::Manhattan => dr + dc,
            Metric::Euclidean => (dr * dr + dc * dc).sqrt(),
        }
    }
}

/// How per-agent distances are folded into one joint estimate.
///
/// `Sum` can overestimate the number of joint steps left, since several agents
/// advance in the same step. `Max` never does and keeps the makespan optimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Sum,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Heuristic {
    pub metric: Metric,
    pub aggregation: Aggregation,
}

impl Heuristic {
    pub fn new(metric: Metric, aggregation: Aggregation) -> Self {
        Heuristic {
            metric,
            aggregation,
        }
    }

    pub fn estimate(&self, state: &JointState, goal: &JointState) -> f64 {
        let distances = state
            .positions()
            .iter()
            .zip(goal.positions())
            .map(|(&from, &to)| self.metric.distance(from, to));

        match self.aggregation {
            Aggregation::Sum => distances.sum(),
            Aggregation::Max => distances.fold(0.0, f64::max),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.metric, self.aggregation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector() {
        assert_eq!(Metric::from_selector(1), Some(Metric::Manhattan));
        assert_eq!(Metric::from_selector(2), Some(Metric::Euclidean));
        assert_eq!(Metric::from_selector(0), None);
        assert_eq!(Metric::from_selector(3), None);
        assert_eq!(Metric::Euclidean.selector(), 2);
    }

    #[test]
    fn test_distance() {
        assert_eq!(Metric::Manhattan.distance((0, 0), (3, 4)), 7.0);
        assert_eq!(Metric::Euclidean.distance((3, 4), (0, 0)), 5.0);
        assert_eq!(Metric::Euclidean.distance((2, 2), (2, 2)), 0.0);
    }

    #[test]
    fn test_estimate() {
        let state = JointState(vec![(0, 0), (1, 1)]);
        let goal = JointState(vec![(3, 4), (1, 3)]);

        let sum = Heuristic::new(Metric::Manhattan, Aggregation::Sum);
        assert_eq!(sum.estimate(&state, &goal), 9.0);

        let max = Heuristic::new(Metric::Manhattan, Aggregation::Max);
        assert_eq!(max.estimate(&state, &goal), 7.0);

        let euclidean = Heuristic::new(Metric::Euclidean, Aggregation::Sum);
        assert_eq!(euclidean.estimate(&state, &goal), 7.0);

        assert_eq!(sum.estimate(&goal, &goal), 0.0);
    }
}
