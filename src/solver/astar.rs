use super::{SearchLimits, SearchOutcome, Solver, Successors};
use crate::common::{Action, Agent, JointState, Solution};
use crate::heuristic::Heuristic;
use crate::map::Map;
use crate::stat::Stats;

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

#[derive(Debug, Clone)]
struct OpenNode {
    f_cost: f64,
    g_cost: usize,
    state: JointState,
    // Index of the expanded parent in the trace arena, and the joint action taken from it.
    parent: Option<(usize, Vec<Action>)>,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .total_cmp(&other.f_cost)
            // Lower g first on equal f.
            .then_with(|| self.g_cost.cmp(&other.g_cost))
            // Lexicographic positions make the pop order fully deterministic.
            // Two entries equal up to here are interchangeable, the set keeps the first.
            .then_with(|| self.state.cmp(&other.state))
    }
}

/// Expanded node, kept so the plan can be rebuilt by walking parents.
struct TraceEntry {
    parent: Option<(usize, Vec<Action>)>,
}

/// Best-first search over joint states with unit cost per joint step.
///
/// Duplicates are resolved lazily: a state can sit in the open list several
/// times, and every pop of an already expanded state is discarded.
pub struct JointAStar {
    agents: Vec<Agent>,
    map: Arc<Map>,
    heuristic: Heuristic,
    limits: SearchLimits,
    stats: Stats,
}

impl JointAStar {
    pub fn new(agents: Vec<Agent>, map: Arc<Map>, heuristic: Heuristic, limits: SearchLimits) -> Self {
        JointAStar {
            agents,
            map,
            heuristic,
            limits,
            stats: Stats::default(),
        }
    }

    fn budget_exhausted(&self, start_time: &Instant) -> bool {
        if let Some(max_expansions) = self.limits.max_expansions {
            if self.stats.expanded_nodes >= max_expansions {
                return true;
            }
        }
        if let Some(time_limit) = self.limits.time_limit {
            if start_time.elapsed() >= time_limit {
                return true;
            }
        }
        false
    }

    #[instrument(skip_all, name = "joint_a_star", fields(agents = self.agents.len(), heuristic = %self.heuristic), level = "debug")]
    fn search(&mut self, start_time: &Instant) -> SearchOutcome {
        let start = JointState::starts(&self.agents);
        let goal = JointState::goals(&self.agents);

        let mut open_list = BTreeSet::new();
        let mut closed_list: HashSet<JointState> = HashSet::new();
        let mut trace: Vec<TraceEntry> = Vec::new();

        let start_h_cost = self.heuristic.estimate(&start, &goal);
        self.stats.initial_heuristic = start_h_cost;
        open_list.insert(OpenNode {
            f_cost: start_h_cost,
            g_cost: 0,
            state: start,
            parent: None,
        });

        while let Some(current) = open_list.pop_first() {
            if current.state == goal {
                debug!("reach goal with cost {}", current.g_cost);
                return SearchOutcome::Solved(construct_solution(&trace, current.parent));
            }

            if closed_list.contains(&current.state) {
                continue;
            }

            if self.budget_exhausted(start_time) {
                debug!("budget exhausted after {} expansions", self.stats.expanded_nodes);
                return SearchOutcome::BudgetExhausted;
            }

            trace!("expand node: {:?} f {} g {}", current.state, current.f_cost, current.g_cost);
            closed_list.insert(current.state.clone());
            self.stats.expanded_nodes += 1;

            let index = trace.len();
            trace.push(TraceEntry {
                parent: current.parent,
            });

            // Uniform cost: one joint step, however many agents actually move.
            let tentative_g_cost = current.g_cost + 1;

            for (actions, successor) in Successors::new(&self.map, &current.state) {
                if closed_list.contains(&successor) {
                    continue;
                }
                let h_cost = self.heuristic.estimate(&successor, &goal);
                self.stats.generated_nodes += 1;
                open_list.insert(OpenNode {
                    f_cost: tentative_g_cost as f64 + h_cost,
                    g_cost: tentative_g_cost,
                    state: successor,
                    parent: Some((index, actions)),
                });
            }
        }

        debug!("cannot find solution");
        SearchOutcome::NoSolution
    }
}

impl Solver for JointAStar {
    fn solve(&mut self) -> SearchOutcome {
        self.stats = Stats::default();
        let total_solve_start_time = Instant::now();

        let outcome = self.search(&total_solve_start_time);

        self.stats.total_time = total_solve_start_time.elapsed();
        if let SearchOutcome::Solved(solution) = &outcome {
            self.stats.makespan = solution.makespan();
        }
        info!("{} search finished: {}", self.heuristic, outcome_label(&outcome));
        self.stats.print();
        outcome
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }
}

fn outcome_label(outcome: &SearchOutcome) -> &'static str {
    match outcome {
        SearchOutcome::Solved(_) => "solved",
        SearchOutcome::NoSolution => "no solution",
        SearchOutcome::BudgetExhausted => "budget exhausted",
    }
}

fn construct_solution(trace: &[TraceEntry], mut link: Option<(usize, Vec<Action>)>) -> Solution {
    let mut actions = Vec::new();
    while let Some((index, joint_action)) = link {
        actions.push(joint_action);
        link = trace[index].parent.clone();
    }
    actions.reverse();
    Solution { actions }
}
