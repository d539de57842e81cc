//! Scheduler settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cp::ScheduleObjective;
use crate::error::ScheduleError;
use crate::models::{Horizon, DEFAULT_HORIZON_HIGH, DEFAULT_HORIZON_LOW, DEFAULT_MIN_GAP};
use crate::solver::{SolverConfig, ValueSelection};

/// Default wall-clock budget for one solve (ms).
pub const DEFAULT_TIME_LIMIT_MS: u64 = 10_000;

/// Scheduler settings, loadable from the `[scheduler]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Lower bound of every start/end variable.
    pub horizon_low: i64,
    /// Upper bound of every start/end variable.
    pub horizon_high: i64,
    /// `start(next) >= end(prev) + min_gap`. With inclusive ends, 1 means
    /// the next task may begin on the unit right after the previous one.
    pub min_gap: i64,
    /// Feasibility only, or tightest packing.
    pub objective: ScheduleObjective,
    /// Wall-clock budget per solve (ms). `None` = unbounded.
    pub time_limit_ms: Option<u64>,
    /// Search node budget per solve. `None` = unbounded.
    pub node_limit: Option<u64>,
    /// Value ordering used by the search.
    pub value_selection: ValueSelection,
    /// Seed for random value ordering.
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            horizon_low: DEFAULT_HORIZON_LOW,
            horizon_high: DEFAULT_HORIZON_HIGH,
            min_gap: DEFAULT_MIN_GAP,
            objective: ScheduleObjective::Satisfy,
            time_limit_ms: Some(DEFAULT_TIME_LIMIT_MS),
            node_limit: None,
            value_selection: ValueSelection::Min,
            seed: None,
        }
    }
}

impl SchedulerConfig {
    /// Sets the horizon bounds.
    pub fn with_horizon(mut self, low: i64, high: i64) -> Self {
        self.horizon_low = low;
        self.horizon_high = high;
        self
    }

    /// Sets the mandatory gap.
    pub fn with_min_gap(mut self, min_gap: i64) -> Self {
        self.min_gap = min_gap;
        self
    }

    /// Sets the objective.
    pub fn with_objective(mut self, objective: ScheduleObjective) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_time_limit_ms(mut self, limit: u64) -> Self {
        self.time_limit_ms = Some(limit);
        self
    }

    /// Sets the node budget.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Sets the value ordering and seed.
    pub fn with_value_selection(mut self, selection: ValueSelection, seed: Option<u64>) -> Self {
        self.value_selection = selection;
        self.seed = seed;
        self
    }

    /// The horizon as a model type.
    pub fn horizon(&self) -> Horizon {
        Horizon::new(self.horizon_low, self.horizon_high)
    }

    /// Solver settings derived from this config.
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            time_limit: self.time_limit_ms.map(Duration::from_millis),
            node_limit: self.node_limit,
            value_selection: self.value_selection,
            seed: self.seed,
        }
    }

    /// Checks that the settings describe a usable model.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.horizon_low > self.horizon_high {
            return Err(ScheduleError::InvalidConfig(format!(
                "horizon_low ({}) exceeds horizon_high ({})",
                self.horizon_low, self.horizon_high
            )));
        }
        if self.min_gap < 1 {
            return Err(ScheduleError::InvalidConfig(format!(
                "min_gap must be at least 1 so tasks do not overlap, got {}",
                self.min_gap
            )));
        }
        Ok(())
    }
}
