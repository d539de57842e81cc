//! Scheduling domain models.
//!
//! Provides the data types exchanged with callers: the tasks to place,
//! the planning horizon, and the resulting schedule.
//!
//! # Domain Mappings
//!
//! | u-sequence | Project planning | Production | Study plan |
//! |------------|------------------|------------|------------|
//! | Task | Work package | Batch | Course unit |
//! | Horizon | Planning window | Shift calendar | Semester days |
//! | Schedule | Timeline | Run sheet | Calendar |

mod horizon;
mod schedule;
mod task;

pub use horizon::{Horizon, DEFAULT_HORIZON_HIGH, DEFAULT_HORIZON_LOW, DEFAULT_MIN_GAP};
pub use schedule::{Schedule, ScheduleEntry};
pub use task::Task;
