use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

use crate::common::{Agent, Position};
use crate::map::Map;

/// Malformed input, detected while loading and before any search starts.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing agent count on the first line")]
    MissingAgentCount,

    #[error("invalid agent count {0:?}")]
    InvalidAgentCount(String),

    #[error("expected {expected} agent lines, found {found}")]
    MissingAgents { expected: usize, found: usize },

    #[error("line {line}: expected `(row,col) (row,col)`, got {content:?}")]
    InvalidAgentLine { line: usize, content: String },

    #[error("line {line}: cannot parse coordinate {token:?}")]
    InvalidCoordinate { line: usize, token: String },

    #[error("grid has no rows")]
    EmptyGrid,

    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("agent {agent} {which} {position:?} is out of bounds or blocked")]
    UntraversableEndpoint {
        agent: usize,
        which: &'static str,
        position: Position,
    },

    #[error("agents {first} and {second} share {which} {position:?}")]
    SharedEndpoint {
        first: usize,
        second: usize,
        which: &'static str,
        position: Position,
    },
}

/// A loaded planning instance: the agent set in input order plus the grid.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub agents: Vec<Agent>,
    pub map: Map,
}

impl Scenario {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Scenario, ScenarioError> {
        let content = fs::read_to_string(path.as_ref())?;
        let scenario: Scenario = content.parse()?;
        info!(
            "Loaded {:?}: {} agents on a {}x{} grid",
            path.as_ref(),
            scenario.agents.len(),
            scenario.map.height,
            scenario.map.width
        );
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        let mut starts: Vec<Option<usize>> = vec![None; self.map.height * self.map.width];
        let mut goals = starts.clone();

        for agent in &self.agents {
            for (which, position, seen) in [
                ("start", agent.start, &mut starts),
                ("goal", agent.goal, &mut goals),
            ] {
                if !self.map.is_traversable(position.0, position.1) {
                    return Err(ScenarioError::UntraversableEndpoint {
                        agent: agent.id,
                        which,
                        position,
                    });
                }
                let slot = &mut seen[position.0 * self.map.width + position.1];
                if let Some(first) = *slot {
                    return Err(ScenarioError::SharedEndpoint {
                        first,
                        second: agent.id,
                        which,
                        position,
                    });
                }
                *slot = Some(agent.id);
            }
        }
        Ok(())
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let mut lines = content.lines();

        let count_line = lines.next().ok_or(ScenarioError::MissingAgentCount)?.trim();
        let num_agents = count_line
            .parse::<usize>()
            .map_err(|_| ScenarioError::InvalidAgentCount(count_line.to_string()))?;

        let mut agents = Vec::with_capacity(num_agents);
        for id in 0..num_agents {
            let line = id + 1;
            let content = lines.next().ok_or(ScenarioError::MissingAgents {
                expected: num_agents,
                found: id,
            })?;
            let (start, goal) = parse_agent_line(line, content)?;
            agents.push(Agent { id, start, goal });
        }

        let rows: Vec<&str> = lines.filter(|line| !line.trim().is_empty()).collect();
        let map = Map::from_rows(rows.as_slice())?;

        let scenario = Scenario { agents, map };
        scenario.validate()?;
        Ok(scenario)
    }
}

fn parse_agent_line(line: usize, content: &str) -> Result<(Position, Position), ScenarioError> {
    let parts: Vec<&str> = content.split_whitespace().collect();
    match parts.as_slice() {
        [start, goal] => Ok((parse_position(line, start)?, parse_position(line, goal)?)),
        _ => Err(ScenarioError::InvalidAgentLine {
            line,
            content: content.to_string(),
        }),
    }
}

/// Parses `(row,col)`; parentheses are optional.
pub fn parse_position(line: usize, token: &str) -> Result<Position, ScenarioError> {
    let invalid = || ScenarioError::InvalidCoordinate {
        line,
        token: token.to_string(),
    };

    let inner = token.trim().trim_start_matches('(').trim_end_matches(')');
    let (row, col) = inner.split_once(',').ok_or_else(invalid)?;
    let row = row.trim().parse::<usize>().map_err(|_| invalid())?;
    let col = col.trim().parse::<usize>().map_err(|_| invalid())?;
    Ok((row, col))
}
