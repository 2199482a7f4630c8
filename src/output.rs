use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::common::{Agent, Position, Solution};
use crate::stat::Stats;

/// Where the trace (`.output`) and statistics (`.stat`) files of one run go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub trace: PathBuf,
    pub stats: PathBuf,
}

impl OutputPaths {
    /// `<dir>/<map name>-<selector>.output` and `.stat`. The directory defaults
    /// to the one holding the map; the map name stops at its first dot.
    pub fn new(map_path: &Path, selector: u8, output_dir: Option<&Path>) -> Self {
        let map_name = map_path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('.').next())
            .unwrap_or("map");
        let dir = output_dir
            .or_else(|| map_path.parent())
            .unwrap_or_else(|| Path::new(""));

        OutputPaths {
            trace: dir.join(format!("{map_name}-{selector}.output")),
            stats: dir.join(format!("{map_name}-{selector}.stat")),
        }
    }
}

fn format_position((row, col): Position) -> String {
    format!("({row}, {col})")
}

/// One line per agent: its start, then ` <action> <position>` for each step.
pub fn format_trace(solution: &Solution, agents: &[Agent]) -> String {
    let mut output = String::new();
    for (agent, path) in solution.paths(agents).iter().enumerate() {
        let mut line = format_position(path[0]);
        for (step, position) in solution.actions.iter().zip(&path[1..]) {
            let _ = write!(line, " {} {}", step[agent], format_position(*position));
        }
        output.push_str(&line);
        output.push('\n');
    }
    output
}

pub fn format_stats(stats: &Stats) -> String {
    format!(
        "Total time: {:.6}s\nMakespan: {}\nInitial heuristic: {}\nExpanded nodes: {}\n",
        stats.total_time.as_secs_f64(),
        stats.makespan,
        stats.initial_heuristic,
        stats.expanded_nodes
    )
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut writer = io::BufWriter::new(file);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    Ok(())
}

pub fn write_results(
    paths: &OutputPaths,
    solution: &Solution,
    agents: &[Agent],
    stats: &Stats,
) -> Result<()> {
    write_file(&paths.trace, &format_trace(solution, agents))?;
    write_file(&paths.stats, &format_stats(stats))?;
    info!(
        "Wrote {} and {}",
        paths.trace.display(),
        paths.stats.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Action;
    use std::time::Duration;

    fn agents() -> Vec<Agent> {
        vec![
            Agent {
                id: 0,
                start: (0, 0),
                goal: (1, 1),
            },
            Agent {
                id: 1,
                start: (1, 0),
                goal: (0, 0),
            },
        ]
    }

    #[test]
    fn test_output_paths() {
        let paths = OutputPaths::new(Path::new("maps/airport.v2.csv"), 2, None);
        assert_eq!(paths.trace, PathBuf::from("maps/airport-2.output"));
        assert_eq!(paths.stats, PathBuf::from("maps/airport-2.stat"));

        let paths = OutputPaths::new(Path::new("airport.csv"), 1, Some(Path::new("out")));
        assert_eq!(paths.trace, PathBuf::from("out/airport-1.output"));
    }

    #[test]
    fn test_format_trace() {
        let solution = Solution {
            actions: vec![
                vec![Action::Right, Action::Wait],
                vec![Action::Down, Action::Up],
            ],
        };
        let trace = format_trace(&solution, &agents());
        assert_eq!(
            trace,
            "(0, 0) → (0, 1) ↓ (1, 1)\n(1, 0) W (1, 0) ↑ (0, 0)\n"
        );
    }

    #[test]
    fn test_format_stats() {
        let stats = Stats {
            total_time: Duration::from_micros(1250),
            makespan: 2,
            initial_heuristic: 3.0,
            expanded_nodes: 5,
            generated_nodes: 11,
        };
        assert_eq!(
            format_stats(&stats),
            "Total time: 0.001250s\nMakespan: 2\nInitial heuristic: 3\nExpanded nodes: 5\n"
        );
    }

    #[test]
    fn test_write_results() {
        let dir = std::env::temp_dir().join(format!("taxi_plan_output_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let paths = OutputPaths::new(Path::new("map.csv"), 1, Some(&dir));
        let solution = Solution {
            actions: vec![vec![Action::Right, Action::Up]],
        };

        write_results(&paths, &solution, &agents(), &Stats::default()).unwrap();

        let trace = std::fs::read_to_string(&paths.trace).unwrap();
        assert_eq!(trace.lines().count(), 2);
        let stats = std::fs::read_to_string(&paths.stats).unwrap();
        assert!(stats.starts_with("Total time: "));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
