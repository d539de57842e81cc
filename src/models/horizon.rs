//! Planning horizon.

use serde::{Deserialize, Serialize};

/// Default lower bound of every start/end variable.
pub const DEFAULT_HORIZON_LOW: i64 = 1;

/// Default upper bound of every start/end variable.
pub const DEFAULT_HORIZON_HIGH: i64 = 100;

/// Default number of units between the end of one task and the start
/// of the next (`start(next) >= end(prev) + gap`).
pub const DEFAULT_MIN_GAP: i64 = 1;

/// Closed interval `[low, high]` within which all start and end times fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    /// First usable time unit.
    pub low: i64,
    /// Last usable time unit.
    pub high: i64,
}

impl Default for Horizon {
    fn default() -> Self {
        Self {
            low: DEFAULT_HORIZON_LOW,
            high: DEFAULT_HORIZON_HIGH,
        }
    }
}

impl Horizon {
    /// Creates a horizon.
    pub fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// Number of time units available (`high - low + 1`), or 0 if inverted.
    pub fn span(&self) -> i64 {
        if self.high < self.low {
            0
        } else {
            self.high.saturating_sub(self.low).saturating_add(1)
        }
    }
}
