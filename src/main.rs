use taxi_plan::common::Agent;
use taxi_plan::config::{Cli, Config};
use taxi_plan::heuristic::Heuristic;
use taxi_plan::map::Map;
use taxi_plan::output::{write_results, OutputPaths};
use taxi_plan::scenario::Scenario;
use taxi_plan::solver::{JointAStar, SearchOutcome, Solver};
use taxi_plan::stat::Stats;

use anyhow::{ensure, Context};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file {}", config_file.display()))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {}", config_file.display()))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let Scenario { agents, map } = Scenario::load_from_file(&config.map_path)
        .with_context(|| format!("error loading map {}", config.map_path.display()))?;
    let agents = Arc::new(agents);
    let map = Arc::new(map);

    let heuristics = if config.compare {
        config.heuristics()
    } else {
        vec![config.heuristic()?]
    };

    // Each search owns its open and closed lists; only the map and agents are shared.
    let mut handles = Vec::with_capacity(heuristics.len());
    for heuristic in heuristics {
        let agents = Arc::clone(&agents);
        let map = Arc::clone(&map);
        let limits = config.limits();
        handles.push(tokio::task::spawn_blocking(move || {
            let mut solver = JointAStar::new(agents.to_vec(), map, heuristic, limits);
            let outcome = solver.solve();
            (heuristic, outcome, solver.stats().clone())
        }));
    }

    for handle in handles {
        let (heuristic, outcome, stats) = handle.await.context("search task panicked")?;
        report(&config, &map, &agents, heuristic, outcome, &stats)?;
    }

    Ok(())
}

fn report(
    config: &Config,
    map: &Map,
    agents: &[Agent],
    heuristic: Heuristic,
    outcome: SearchOutcome,
    stats: &Stats,
) -> anyhow::Result<()> {
    match outcome {
        SearchOutcome::Solved(solution) => {
            ensure!(
                solution.verify(map, agents),
                "{heuristic} produced an invalid plan"
            );
            let paths = OutputPaths::new(
                &config.map_path,
                heuristic.metric.selector(),
                config.output_dir.as_deref(),
            );
            write_results(&paths, &solution, agents, stats)?;
            if config.json {
                println!("{}", stats.to_json()?);
            }
        }
        SearchOutcome::NoSolution => println!("No solution found."),
        SearchOutcome::BudgetExhausted => {
            warn!(
                "{heuristic}: gave up after {} expansions",
                stats.expanded_nodes
            );
            println!("Search budget exhausted before a solution was found.");
        }
    }
    Ok(())
}
