use super::{Agent, Position};

/// Positions of every agent at one time step, indexed by agent id.
///
/// Equality and hashing only look at the positions, so two states reached by
/// different plans collapse to the same search vertex. The derived ordering is
/// lexicographic over the positions and serves as the final frontier tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JointState(pub Vec<Position>);

impl JointState {
    pub fn starts(agents: &[Agent]) -> Self {
        JointState(agents.iter().map(|agent| agent.start).collect())
    }

    pub fn goals(agents: &[Agent]) -> Self {
        JointState(agents.iter().map(|agent| agent.goal).collect())
    }

    pub fn positions(&self) -> &[Position] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_history() {
        let agents = vec![
            Agent { id: 0, start: (0, 0), goal: (1, 1) },
            Agent { id: 1, start: (2, 2), goal: (0, 1) },
        ];
        let starts = JointState::starts(&agents);
        assert_eq!(starts, JointState(vec![(0, 0), (2, 2)]));
        assert_eq!(JointState::goals(&agents).positions(), &[(1, 1), (0, 1)]);

        let mut visited = HashSet::new();
        visited.insert(starts.clone());
        assert!(!visited.insert(JointState(vec![(0, 0), (2, 2)])));
    }

    #[test]
    fn test_lexicographic_order() {
        let a = JointState(vec![(0, 1), (5, 5)]);
        let b = JointState(vec![(0, 2), (0, 0)]);
        assert!(a < b);
    }
}
