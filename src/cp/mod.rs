//! CP-based sequential scheduling formulation.
//!
//! Bridges the scheduling domain models to the `solver` layer.
//! Builds a `CpModel` from an ordered task list, then solves it using
//! any `CpSolver`.
//!
//! # Formulation
//!
//! For task `i` with duration `d_i`, over horizon `[low, high]`:
//!
//! | Variable / constraint | Meaning |
//! |-----------------------|---------|
//! | `start_i, end_i ∈ [low, high]` | placement |
//! | `end_i = start_i + d_i - 1` | duration consistency |
//! | `start_{i+1} >= end_i + gap` | positional chain |
//!
//! # Reference
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;
use crate::models::{Horizon, Schedule, ScheduleEntry, Task, DEFAULT_MIN_GAP};
use crate::solver::{CpModel, CpSolution, CpSolver, SolveStatus, SolverConfig, VarId};

/// What the solver is asked to do with the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleObjective {
    /// First feasible assignment. Gaps may exceed the minimum.
    #[default]
    Satisfy,
    /// Minimize the end of the last task (tightest packing).
    MinimizeMakespan,
}

/// Start/end variables of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskVars {
    pub start: VarId,
    pub end: VarId,
}

/// A built model together with the per-task variable handles.
#[derive(Debug, Clone)]
pub struct SequenceModel {
    /// The constraint model.
    pub model: CpModel,
    /// Variables per task, in input order.
    pub slots: Vec<TaskVars>,
}

/// Builds a CP model from an ordered task list.
///
/// Every call to `build` produces a fresh, independent model.
///
/// # Example
/// ```
/// use u_sequence::cp::SequenceCpBuilder;
/// use u_sequence::models::{Horizon, Task};
/// use u_sequence::solver::{SearchSolver, SolverConfig};
///
/// let tasks = vec![Task::new("A", 3), Task::new("B", 2)];
/// let builder = SequenceCpBuilder::new(&tasks).with_horizon(Horizon::new(1, 100));
/// let (schedule, _) = builder
///     .solve(&SearchSolver::new(), &SolverConfig::default())
///     .unwrap();
/// assert_eq!(schedule.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceCpBuilder<'a> {
    tasks: &'a [Task],
    horizon: Horizon,
    min_gap: i64,
    objective: ScheduleObjective,
}

impl<'a> SequenceCpBuilder<'a> {
    /// Creates a new builder with the default horizon and gap.
    pub fn new(tasks: &'a [Task]) -> Self {
        Self {
            tasks,
            horizon: Horizon::default(),
            min_gap: DEFAULT_MIN_GAP,
            objective: ScheduleObjective::Satisfy,
        }
    }

    /// Sets the planning horizon.
    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the mandatory gap between consecutive tasks.
    pub fn with_min_gap(mut self, min_gap: i64) -> Self {
        self.min_gap = min_gap;
        self
    }

    /// Sets the objective.
    pub fn with_objective(mut self, objective: ScheduleObjective) -> Self {
        self.objective = objective;
        self
    }

    /// Builds the CP model.
    ///
    /// Creates:
    /// - Two variables (`start`, `end`) per task over the horizon
    /// - An `Offset` constraint per task (`end = start + duration - 1`)
    /// - An `AtLeast` constraint per consecutive pair (`start' >= end + gap`)
    /// - Optionally a makespan objective on the last `end`
    pub fn build(&self) -> SequenceModel {
        let mut model = CpModel::new("sequence");
        let mut slots: Vec<TaskVars> = Vec::with_capacity(self.tasks.len());

        for (i, task) in self.tasks.iter().enumerate() {
            let start = model.new_int_var(
                self.horizon.low,
                self.horizon.high,
                format!("start_{i}_{}", task.name),
            );
            let end = model.new_int_var(
                self.horizon.low,
                self.horizon.high,
                format!("end_{i}_{}", task.name),
            );
            model.add_offset(end, start, task.duration.saturating_sub(1));

            if let Some(prev) = slots.last() {
                model.add_at_least(start, prev.end, self.min_gap);
            }
            slots.push(TaskVars { start, end });
        }

        if let (ScheduleObjective::MinimizeMakespan, Some(last)) = (self.objective, slots.last()) {
            model.minimize(last.end);
        }

        SequenceModel { model, slots }
    }

    /// Solves the sequencing problem and returns the schedule.
    ///
    /// The solve status is inspected before any value is read:
    /// infeasibility and budget expiry are reported as errors, never as
    /// an empty or partial schedule.
    pub fn solve<S: CpSolver>(
        &self,
        solver: &S,
        config: &SolverConfig,
    ) -> Result<(Schedule, CpSolution), ScheduleError> {
        let built = self.build();
        let solution = solver.solve(&built.model, config);
        let schedule = self.decode_solution(&built, &solution)?;
        Ok((schedule, solution))
    }

    /// Total units the chain occupies when packed as tightly as allowed.
    ///
    /// Ends are inclusive, so a gap of 1 leaves no idle unit between
    /// tasks and every extra unit of gap adds one idle unit per pair.
    pub fn required_span(&self) -> i64 {
        let busy = self
            .tasks
            .iter()
            .fold(0i64, |acc, t| acc.saturating_add(t.duration));
        let idle = self
            .min_gap
            .saturating_sub(1)
            .saturating_mul(self.tasks.len().saturating_sub(1) as i64);
        busy.saturating_add(idle)
    }

    /// Decodes a CP solution into a Schedule.
    fn decode_solution(
        &self,
        built: &SequenceModel,
        solution: &CpSolution,
    ) -> Result<Schedule, ScheduleError> {
        match solution.status {
            SolveStatus::Optimal | SolveStatus::Feasible => {}
            SolveStatus::Infeasible => return Err(self.infeasible()),
            SolveStatus::Unknown => {
                return Err(ScheduleError::Timeout {
                    elapsed: solution.elapsed,
                    nodes: solution.nodes,
                })
            }
        }

        let entries: Option<Vec<ScheduleEntry>> = self
            .tasks
            .iter()
            .zip(&built.slots)
            .map(|(task, slot)| {
                Some(ScheduleEntry::new(
                    &task.name,
                    solution.value(slot.start)?,
                    solution.value(slot.end)?,
                ))
            })
            .collect();

        entries.map(Schedule::from).ok_or_else(|| self.infeasible())
    }

    fn infeasible(&self) -> ScheduleError {
        ScheduleError::Infeasible {
            task_count: self.tasks.len(),
            required_span: self.required_span(),
            available_span: self.horizon.span(),
        }
    }
}
