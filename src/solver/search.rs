//! Depth-first search with propagation and branch-and-bound.
//!
//! # Algorithm
//!
//! 1. Propagate the root domains; a wipeout proves infeasibility.
//! 2. Pick the first unfixed variable (model order) and a value `v`
//!    according to `ValueSelection`.
//! 3. Branch on `x = v`, then `x < v`, then `x > v`. The three branches
//!    partition the domain, so the search is complete.
//! 4. When every variable is fixed, record the solution. Under
//!    `Objective::Satisfy` the search stops; under `Objective::Minimize`
//!    the objective is capped at `best - 1` and the search continues.
//! 5. The node and wall-clock budgets are checked before every node;
//!    the wall-clock deadline is also checked inside propagation.
//!
//! # Reference
//! Van Beek (2006), "Backtracking Search Algorithms", Handbook of
//! Constraint Programming, Ch. 4

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::model::{CpModel, Objective, VarId};
use super::propagate::{propagate, Bounds, Propagation};

/// Value ordering heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSelection {
    /// Smallest value in the domain first.
    #[default]
    Min,
    /// Largest value in the domain first.
    Max,
    /// Uniformly random value in the domain first.
    Random,
}

/// Search budget and heuristics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Wall-clock budget. `None` = unbounded.
    pub time_limit: Option<Duration>,
    /// Maximum number of search nodes. `None` = unbounded.
    pub node_limit: Option<u64>,
    /// Value ordering.
    pub value_selection: ValueSelection,
    /// Seed for `ValueSelection::Random`. `None` = OS entropy.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: None,
            node_limit: None,
            value_selection: ValueSelection::Min,
            seed: None,
        }
    }
}

impl SolverConfig {
    /// Sets the wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the node budget.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Sets the value ordering.
    pub fn with_value_selection(mut self, selection: ValueSelection) -> Self {
        self.value_selection = selection;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Solution found and proven optimal (or any solution under `Satisfy`).
    Optimal,
    /// Solution found, budget expired before optimality was proven.
    Feasible,
    /// Proven that no solution exists.
    Infeasible,
    /// Budget expired before finding a solution or proving infeasibility.
    Unknown,
}

/// Result of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpSolution {
    /// Solve outcome.
    pub status: SolveStatus,
    values: Vec<i64>,
    /// Objective value of the returned solution, if minimizing.
    pub objective_value: Option<i64>,
    /// Number of search nodes explored.
    pub nodes: u64,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

impl CpSolution {
    /// Whether a satisfying assignment is available.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolveStatus::Optimal | SolveStatus::Feasible)
    }

    /// Value of `var` in the solution. `None` when no solution was found.
    pub fn value(&self, var: VarId) -> Option<i64> {
        if self.is_solution_found() {
            self.values.get(var.index()).copied()
        } else {
            None
        }
    }
}

/// A constraint solver.
pub trait CpSolver {
    /// Solves the model within the configured budget.
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution;
}

/// Complete depth-first solver over interval domains.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchSolver;

impl SearchSolver {
    /// Creates a new solver.
    pub fn new() -> Self {
        Self
    }
}

impl CpSolver for SearchSolver {
    fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
        let started = Instant::now();
        let deadline = config.time_limit.and_then(|limit| started.checked_add(limit));
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let root: Vec<Bounds> = model
            .vars()
            .iter()
            .map(|v| Bounds::new(v.lb, v.ub))
            .collect();

        let mut stack = vec![root];
        let mut best: Option<(Vec<i64>, Option<i64>)> = None;
        let mut cutoff: Option<i64> = None;
        let mut nodes: u64 = 0;
        let mut exhausted_budget = false;

        while let Some(mut domains) = stack.pop() {
            if budget_exceeded(config, nodes, started) {
                exhausted_budget = true;
                break;
            }
            nodes += 1;

            if let (Objective::Minimize(var), Some(cap)) = (model.objective(), cutoff) {
                let d = &mut domains[var.index()];
                d.ub = d.ub.min(cap);
            }

            match propagate(model.constraints(), &mut domains, deadline) {
                Propagation::Consistent => {}
                Propagation::Wipeout => continue,
                Propagation::Interrupted => {
                    exhausted_budget = true;
                    break;
                }
            }

            match domains.iter().position(|d| !d.is_fixed()) {
                None => {
                    let values: Vec<i64> = domains.iter().map(|d| d.lb).collect();
                    match model.objective() {
                        Objective::Satisfy => {
                            best = Some((values, None));
                            break;
                        }
                        Objective::Minimize(var) => {
                            let value = values[var.index()];
                            trace!(objective = value, nodes, "improved solution");
                            cutoff = Some(value.saturating_sub(1));
                            best = Some((values, Some(value)));
                        }
                    }
                }
                Some(idx) => {
                    let d = domains[idx];
                    let v = match config.value_selection {
                        ValueSelection::Min => d.lb,
                        ValueSelection::Max => d.ub,
                        ValueSelection::Random => rng.random_range(d.lb..=d.ub),
                    };

                    // Pushed in reverse: `x = v` is explored first.
                    if v < d.ub {
                        let mut above = domains.clone();
                        above[idx] = Bounds::new(v + 1, d.ub);
                        stack.push(above);
                    }
                    if v > d.lb {
                        let mut below = domains.clone();
                        below[idx] = Bounds::new(d.lb, v - 1);
                        stack.push(below);
                    }
                    domains[idx] = Bounds::new(v, v);
                    stack.push(domains);
                }
            }
        }

        let status = match (&best, exhausted_budget) {
            (Some(_), false) => SolveStatus::Optimal,
            (Some(_), true) => SolveStatus::Feasible,
            (None, false) => SolveStatus::Infeasible,
            (None, true) => SolveStatus::Unknown,
        };
        let elapsed = started.elapsed();

        debug!(
            model = model.name(),
            vars = model.var_count(),
            constraints = model.constraint_count(),
            ?status,
            nodes,
            elapsed_us = elapsed.as_micros() as u64,
            "solve finished"
        );

        let (values, objective_value) = best.unwrap_or_default();
        CpSolution {
            status,
            values,
            objective_value,
            nodes,
            elapsed,
        }
    }
}

fn budget_exceeded(config: &SolverConfig, nodes: u64, started: Instant) -> bool {
    if config.node_limit.is_some_and(|limit| nodes >= limit) {
        return true;
    }
    config
        .time_limit
        .is_some_and(|limit| started.elapsed() >= limit)
}
