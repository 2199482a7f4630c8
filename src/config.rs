use anyhow::{anyhow, Context};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::heuristic::{Aggregation, Heuristic, Metric};
use crate::solver::SearchLimits;

#[derive(Parser, Debug)]
#[command(
    name = "taxi_plan",
    about = "Collision-free joint taxi planning for multiple agents on a grid.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(help = "Path to the map file (agents followed by `;`-separated grid rows)")]
    pub map_path: Option<PathBuf>,

    #[arg(help = "Heuristic selector: 1 = Manhattan, 2 = Euclidean")]
    pub heuristic: Option<u8>,

    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, help = "How per-agent distances are combined")]
    pub aggregation: Option<Aggregation>,

    #[arg(long, help = "Stop after expanding this many joint states")]
    pub max_expansions: Option<usize>,

    #[arg(long, help = "Stop after this many milliseconds of search")]
    pub time_limit_ms: Option<u64>,

    #[arg(long, help = "Directory for the trace and statistics files")]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long,
        help = "Run the Manhattan and Euclidean searches concurrently",
        default_value_t = false
    )]
    pub compare: bool,

    #[arg(long, help = "Print statistics as JSON", default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub map_path: PathBuf,
    pub heuristic: u8,
    pub aggregation: Aggregation,
    pub max_expansions: Option<usize>,
    pub time_limit_ms: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub compare: bool,
    pub json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            map_path: PathBuf::new(),
            heuristic: 1,
            aggregation: Aggregation::Sum,
            max_expansions: None,
            time_limit_ms: None,
            output_dir: None,
            compare: false,
            json: false,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("cannot parse YAML config")
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(map_path) = &cli.map_path {
            self.map_path = map_path.clone();
        }
        if let Some(heuristic) = cli.heuristic {
            self.heuristic = heuristic;
        }
        if let Some(aggregation) = cli.aggregation {
            self.aggregation = aggregation;
        }
        if cli.max_expansions.is_some() {
            self.max_expansions = cli.max_expansions;
        }
        if cli.time_limit_ms.is_some() {
            self.time_limit_ms = cli.time_limit_ms;
        }
        if cli.output_dir.is_some() {
            self.output_dir = cli.output_dir.clone();
        }
        self.compare |= cli.compare;
        self.json |= cli.json;

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.map_path.as_os_str().is_empty() {
            return Err(anyhow!("No map file given"));
        }
        if Metric::from_selector(self.heuristic).is_none() {
            return Err(anyhow!(
                "Heuristic must be 1 (Manhattan) or 2 (Euclidean), got {}",
                self.heuristic
            ));
        }
        Ok(())
    }

    pub fn heuristic(&self) -> anyhow::Result<Heuristic> {
        let metric = Metric::from_selector(self.heuristic)
            .ok_or_else(|| anyhow!("Unknown heuristic selector {}", self.heuristic))?;
        Ok(Heuristic::new(metric, self.aggregation))
    }

    /// Every metric, for comparison runs.
    pub fn heuristics(&self) -> Vec<Heuristic> {
        [Metric::Manhattan, Metric::Euclidean]
            .into_iter()
            .map(|metric| Heuristic::new(metric, self.aggregation))
            .collect()
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_expansions: self.max_expansions,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let cli = Cli::parse_from(["taxi_plan", "maps/airport.csv", "2", "--max-expansions", "500"]);
        let config = Config::default().override_from_command_line(&cli).unwrap();

        assert_eq!(config.map_path, PathBuf::from("maps/airport.csv"));
        assert_eq!(config.heuristic().unwrap().metric, Metric::Euclidean);
        assert_eq!(config.limits().max_expansions, Some(500));
        assert_eq!(config.limits().time_limit, None);
    }

    #[test]
    fn test_invalid_selector() {
        let cli = Cli::parse_from(["taxi_plan", "maps/airport.csv", "3"]);
        assert!(Config::default().override_from_command_line(&cli).is_err());
    }

    #[test]
    fn test_missing_map() {
        let cli = Cli::parse_from(["taxi_plan"]);
        assert!(Config::default().override_from_command_line(&cli).is_err());
    }

    #[test]
    fn test_yaml_then_command_line() {
        let config = Config::from_yaml_str(
            "map_path: maps/airport.csv\nheuristic: 2\naggregation: max\ntime_limit_ms: 250\n",
        )
        .unwrap();
        assert_eq!(config.aggregation, Aggregation::Max);
        assert_eq!(config.limits().time_limit, Some(Duration::from_millis(250)));

        let cli = Cli::parse_from(["taxi_plan", "--aggregation", "sum", "--compare"]);
        let config = config.override_from_command_line(&cli).unwrap();
        assert_eq!(config.heuristic, 2);
        assert_eq!(config.aggregation, Aggregation::Sum);
        assert!(config.compare);
        assert_eq!(config.heuristics().len(), 2);
    }
}
