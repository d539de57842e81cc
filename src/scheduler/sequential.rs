//! Sequential scheduler.
//!
//! # Algorithm
//!
//! 1. Validate the task list (names, durations); collect duplicate-name warnings.
//! 2. Build a fresh CP model for this request (`SequenceCpBuilder`).
//! 3. Solve it within the configured budget.
//! 4. Check the solve status, then read start/end values in input order.
//!
//! # Complexity
//! Propagation is O(n) per pass over a chain of n tasks. With `Min`
//! value ordering the first descent reaches a solution without
//! backtracking.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cp::SequenceCpBuilder;
use crate::error::ScheduleError;
use crate::models::{Schedule, Task};
use crate::solver::{CpSolver, SearchSolver, SolveStatus};
use crate::validation::{validate_tasks, DuplicateName};

use super::SchedulerConfig;

/// A schedule together with the non-fatal findings and solver statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleOutcome {
    /// The computed schedule, in input order.
    pub schedule: Schedule,
    /// Duplicate task names in the request.
    pub warnings: Vec<DuplicateName>,
    /// Solve status (`Optimal` or `Feasible`).
    pub status: SolveStatus,
    /// Search nodes explored.
    pub nodes: u64,
    /// Time spent in the solver.
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Places an ordered list of tasks on a constraint model.
///
/// Holds no per-request state: every call builds its own model and
/// solver run, so one scheduler can serve concurrent requests.
///
/// # Example
///
/// ```
/// use u_sequence::models::Task;
/// use u_sequence::scheduler::SequentialScheduler;
///
/// let tasks = vec![Task::new("A", 3), Task::new("B", 2)];
/// let schedule = SequentialScheduler::new().schedule(&tasks).unwrap();
///
/// let a = &schedule.entries()[0];
/// let b = &schedule.entries()[1];
/// assert_eq!(a.end, a.start + 2);
/// assert!(b.start >= a.end + 1);
/// ```
#[derive(Debug, Clone)]
pub struct SequentialScheduler<S = SearchSolver> {
    config: SchedulerConfig,
    solver: S,
}

impl SequentialScheduler<SearchSolver> {
    /// Creates a scheduler with default settings.
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Creates a scheduler with the given settings.
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            solver: SearchSolver::new(),
        }
    }
}

impl Default for SequentialScheduler<SearchSolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CpSolver> SequentialScheduler<S> {
    /// Replaces the solver implementation.
    pub fn with_solver<T: CpSolver>(self, solver: T) -> SequentialScheduler<T> {
        SequentialScheduler {
            config: self.config,
            solver,
        }
    }

    /// Current settings.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Schedules tasks, returning only the schedule.
    ///
    /// Duplicate-name warnings are logged; use `schedule_detailed` to
    /// receive them.
    pub fn schedule(&self, tasks: &[Task]) -> Result<Schedule, ScheduleError> {
        self.schedule_detailed(tasks).map(|outcome| outcome.schedule)
    }

    /// Schedules tasks, returning the schedule with warnings and statistics.
    pub fn schedule_detailed(&self, tasks: &[Task]) -> Result<ScheduleOutcome, ScheduleError> {
        self.config.validate()?;
        let warnings = validate_tasks(tasks).map_err(ScheduleError::Validation)?;
        for dup in &warnings {
            warn!(name = %dup.name, positions = ?dup.positions, "duplicate task name");
        }

        let builder = SequenceCpBuilder::new(tasks)
            .with_horizon(self.config.horizon())
            .with_min_gap(self.config.min_gap)
            .with_objective(self.config.objective);

        debug!(
            tasks = tasks.len(),
            required_span = builder.required_span(),
            available_span = self.config.horizon().span(),
            "building sequence model"
        );

        let (schedule, solution) = builder
            .solve(&self.solver, &self.config.solver_config())
            .inspect_err(|err| warn!(error = %err, "scheduling failed"))?;

        info!(
            tasks = schedule.len(),
            makespan = ?schedule.makespan(),
            idle_units = schedule.idle_units(),
            status = ?solution.status,
            nodes = solution.nodes,
            "schedule computed"
        );

        Ok(ScheduleOutcome {
            schedule,
            warnings,
            status: solution.status,
            nodes: solution.nodes,
            elapsed: solution.elapsed,
        })
    }
}

impl<S: CpSolver + Clone + Send + 'static> SequentialScheduler<S> {
    /// Runs `schedule_detailed` on the blocking thread pool.
    ///
    /// The solve is CPU-bound; async callers use this so the runtime's
    /// worker threads stay free while the solver budget runs down.
    pub async fn schedule_blocking(
        &self,
        tasks: Vec<Task>,
    ) -> Result<ScheduleOutcome, ScheduleError> {
        let scheduler = self.clone();
        match tokio::task::spawn_blocking(move || scheduler.schedule_detailed(&tasks)).await {
            Ok(result) => result,
            Err(join) if join.is_panic() => std::panic::resume_unwind(join.into_panic()),
            Err(join) => Err(ScheduleError::Interrupted(join.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::ScheduleObjective;
    use crate::models::ScheduleEntry;
    use crate::solver::{CpModel, CpSolution, SolverConfig, ValueSelection};
    use crate::validation::ValidationErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn assert_invariants(tasks: &[Task], schedule: &Schedule, low: i64, high: i64) {
        assert_eq!(schedule.len(), tasks.len());
        for (entry, task) in schedule.iter().zip(tasks) {
            assert_eq!(entry.task, task.name);
            assert_eq!(entry.end - entry.start + 1, task.duration);
            assert!(entry.start >= low && entry.end <= high);
        }
        for pair in schedule.entries().windows(2) {
            assert!(pair[1].start >= pair[0].end + 1);
        }
    }

    #[test]
    fn test_empty_input() {
        let schedule = SequentialScheduler::new().schedule(&[]).unwrap();
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_single_task() {
        let tasks = vec![Task::new("A", 5)];
        let schedule = SequentialScheduler::new().schedule(&tasks).unwrap();
        let a = &schedule.entries()[0];
        assert_eq!(a.end, a.start + 4);
        assert_invariants(&tasks, &schedule, 1, 100);
    }

    #[test]
    fn test_single_task_minimal_placement() {
        let tasks = vec![Task::new("A", 5)];
        let config = SchedulerConfig::default().with_objective(ScheduleObjective::MinimizeMakespan);
        let schedule = SequentialScheduler::with_config(config)
            .schedule(&tasks)
            .unwrap();
        assert_eq!(schedule.entries()[0], ScheduleEntry::new("A", 1, 5));
    }

    #[test]
    fn test_two_task_chain() {
        let tasks = vec![Task::new("A", 3), Task::new("B", 2)];
        let schedule = SequentialScheduler::new().schedule(&tasks).unwrap();
        assert_invariants(&tasks, &schedule, 1, 100);
    }

    #[test]
    fn test_two_task_chain_max_ordering() {
        let tasks = vec![Task::new("A", 3), Task::new("B", 2)];
        let config = SchedulerConfig::default().with_value_selection(ValueSelection::Max, None);
        let schedule = SequentialScheduler::with_config(config)
            .schedule(&tasks)
            .unwrap();
        assert_invariants(&tasks, &schedule, 1, 100);
        assert_eq!(schedule.entries()[1].end, 100);
    }

    #[test]
    fn test_infeasible() {
        let tasks = vec![Task::new("A", 40), Task::new("B", 40), Task::new("C", 40)];
        let err = SequentialScheduler::new().schedule(&tasks).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Infeasible {
                required_span: 120,
                available_span: 100,
                ..
            }
        ));
    }

    #[test]
    fn test_exact_fit() {
        let tasks = vec![Task::new("A", 50), Task::new("B", 50)];
        let schedule = SequentialScheduler::new().schedule(&tasks).unwrap();
        assert_eq!(schedule.entries()[0], ScheduleEntry::new("A", 1, 50));
        assert_eq!(schedule.entries()[1], ScheduleEntry::new("B", 51, 100));

        let overflow = vec![Task::new("A", 50), Task::new("B", 51)];
        assert!(SequentialScheduler::new().schedule(&overflow).is_err());
    }

    #[test]
    fn test_custom_horizon_and_gap() {
        let tasks = vec![Task::new("A", 2), Task::new("B", 2)];
        let config = SchedulerConfig::default()
            .with_horizon(10, 20)
            .with_min_gap(3)
            .with_objective(ScheduleObjective::MinimizeMakespan);
        let schedule = SequentialScheduler::with_config(config)
            .schedule(&tasks)
            .unwrap();
        assert_eq!(schedule.entries()[0], ScheduleEntry::new("A", 10, 11));
        assert_eq!(schedule.entries()[1], ScheduleEntry::new("B", 14, 15));
    }

    #[test]
    fn test_validation_before_solve() {
        struct CountingSolver(AtomicUsize);
        impl CpSolver for CountingSolver {
            fn solve(&self, model: &CpModel, config: &SolverConfig) -> CpSolution {
                self.0.fetch_add(1, Ordering::SeqCst);
                SearchSolver::new().solve(model, config)
            }
        }

        for duration in [0, -1] {
            let scheduler =
                SequentialScheduler::new().with_solver(CountingSolver(AtomicUsize::new(0)));
            let err = scheduler
                .schedule(&[Task::new("A", duration)])
                .unwrap_err();

            match err {
                ScheduleError::Validation(errors) => {
                    assert_eq!(errors[0].kind, ValidationErrorKind::NonPositiveDuration)
                }
                other => panic!("expected validation error, got {other:?}"),
            }
            assert_eq!(scheduler.solver.0.load(Ordering::SeqCst), 0);
        }
    }

    #[test]
    fn test_duplicate_names_are_scheduled_positionally() {
        let tasks = vec![Task::new("A", 2), Task::new("A", 3)];
        let outcome = SequentialScheduler::new().schedule_detailed(&tasks).unwrap();

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].positions, vec![0, 1]);
        assert_invariants(&tasks, &outcome.schedule, 1, 100);
        assert_eq!(outcome.schedule.entries()[1].duration(), 3);
    }

    #[test]
    fn test_invalid_config() {
        let config = SchedulerConfig::default().with_horizon(5, 1);
        let err = SequentialScheduler::with_config(config)
            .schedule(&[Task::new("A", 1)])
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidConfig(_)));
    }

    #[test]
    fn test_node_budget_expiry_is_timeout() {
        let config = SchedulerConfig::default().with_node_limit(0);
        let err = SequentialScheduler::with_config(config)
            .schedule(&[Task::new("A", 1)])
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Timeout { .. }));
    }

    fn unit_tasks(n: usize) -> Vec<Task> {
        (0..n).map(|i| Task::new(format!("t{i}"), 1)).collect()
    }

    #[test]
    fn test_time_budget_bounds_long_chains() {
        let config = SchedulerConfig::default()
            .with_horizon(1, 1_000_000)
            .with_time_limit_ms(100);
        let tasks = unit_tasks(20_000);

        let started = std::time::Instant::now();
        let result = SequentialScheduler::with_config(config).schedule(&tasks);

        assert!(started.elapsed() < Duration::from_secs(2));
        match result {
            Ok(schedule) => assert_invariants(&tasks, &schedule, 1, 1_000_000),
            Err(err) => assert!(matches!(err, ScheduleError::Timeout { .. }), "{err}"),
        }
    }

    #[test]
    fn test_long_infeasible_chain_fails_fast() {
        let started = std::time::Instant::now();
        let err = SequentialScheduler::new()
            .schedule(&unit_tasks(10_000))
            .unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(matches!(
            err,
            ScheduleError::Infeasible {
                task_count: 10_000,
                required_span: 10_000,
                available_span: 100,
            }
        ));
    }

    #[tokio::test]
    async fn test_schedule_blocking() {
        let tasks = vec![Task::new("A", 3), Task::new("B", 2)];
        let outcome = SequentialScheduler::new()
            .schedule_blocking(tasks.clone())
            .await
            .unwrap();
        assert_invariants(&tasks, &outcome.schedule, 1, 100);
        assert_eq!(outcome.status, SolveStatus::Optimal);
    }

    #[test]
    fn test_repeated_runs_keep_invariants() {
        let tasks = vec![Task::new("A", 7), Task::new("B", 11), Task::new("C", 3)];
        for seed in 0..20 {
            let config =
                SchedulerConfig::default().with_value_selection(ValueSelection::Random, Some(seed));
            let schedule = SequentialScheduler::with_config(config)
                .schedule(&tasks)
                .unwrap();
            assert_invariants(&tasks, &schedule, 1, 100);
        }
    }
}
