//! Task model.
//!
//! A task is a named unit of work with a fixed duration. Tasks are
//! ordered by their position in the request; that order is the only
//! precedence relation.

use serde::{Deserialize, Serialize};

/// A task to be scheduled.
///
/// # Time Representation
/// Durations are counted in discrete time units and include both
/// endpoints: a task of duration 3 starting at 4 occupies 4, 5 and 6.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    /// Task name, carried through to the schedule unchanged.
    pub name: String,
    /// Number of time units occupied. Must be positive.
    pub duration: i64,
}

impl Task {
    /// Creates a new task.
    pub fn new(name: impl Into<String>, duration: i64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_new() {
        let task = Task::new("Design", 5);
        assert_eq!(task.name, "Design");
        assert_eq!(task.duration, 5);
    }

    #[test]
    fn test_task_deserialize() {
        let task: Task = serde_json::from_str(r#"{"name": "A", "duration": 3}"#).unwrap();
        assert_eq!(task, Task::new("A", 3));
    }

    #[test]
    fn test_task_rejects_fractional_duration() {
        let result = serde_json::from_str::<Task>(r#"{"name": "A", "duration": 2.5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_task_rejects_missing_name() {
        let result = serde_json::from_str::<Task>(r#"{"duration": 2}"#);
        assert!(result.is_err());
    }
}
