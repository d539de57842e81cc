//! Sequential scheduler and its settings.
//!
//! `SequentialScheduler` is the entry point of the scheduling core:
//! validate, build a fresh constraint model, solve, decode.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"

mod config;
mod sequential;

pub use config::{SchedulerConfig, DEFAULT_TIME_LIMIT_MS};
pub use sequential::{ScheduleOutcome, SequentialScheduler};
