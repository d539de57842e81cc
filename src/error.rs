//! Error types.
//!
//! Each layer has its own enum: scheduling, explanation, the combined
//! plan operation, and configuration loading.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::validation::ValidationError;

/// Scheduling failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Malformed input, detected before any model was built.
    #[error("invalid tasks: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// The model has no satisfying assignment.
    #[error(
        "no feasible schedule: {task_count} tasks need {required_span} time units, \
         the horizon offers {available_span}"
    )]
    Infeasible {
        task_count: usize,
        required_span: i64,
        available_span: i64,
    },

    /// The solver budget expired before a feasible or infeasible determination.
    #[error("solver budget exhausted after {nodes} nodes in {elapsed:?}")]
    Timeout { elapsed: Duration, nodes: u64 },

    /// Scheduler settings are unusable (e.g. inverted horizon).
    #[error("invalid scheduler configuration: {0}")]
    InvalidConfig(String),

    /// The solve task was cancelled before it completed.
    #[error("scheduling was interrupted: {0}")]
    Interrupted(String),
}

/// Explanation failure.
#[derive(Error, Debug)]
pub enum ExplainError {
    /// The backend could not be reached or the request failed in transit.
    #[error("explanation backend unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("explanation backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend payload could not be interpreted.
    #[error("malformed explanation backend response: {0}")]
    MalformedResponse(String),

    /// A reasoning marker appeared without its counterpart.
    #[error("unmatched reasoning delimiter '{marker}' in model output")]
    UnmatchedDelimiter { marker: String },

    /// Nothing was left after post-processing.
    #[error("explanation is empty after removing the reasoning trace")]
    Empty,
}

/// Failure of the combined schedule-then-explain operation.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Explain(#[from] ExplainError),
}

/// Configuration loading failure.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::validation::validate_tasks;

    #[test]
    fn test_validation_message_lists_every_error() {
        let errors = validate_tasks(&[Task::new("A", 0), Task::new("", 2)]).unwrap_err();
        let err = ScheduleError::Validation(errors);
        let msg = err.to_string();
        assert!(msg.starts_with("invalid tasks: "));
        assert!(msg.contains("task #0"));
        assert!(msg.contains("task #1"));
    }

    #[test]
    fn test_infeasible_message() {
        let err = ScheduleError::Infeasible {
            task_count: 3,
            required_span: 122,
            available_span: 100,
        };
        assert_eq!(
            err.to_string(),
            "no feasible schedule: 3 tasks need 122 time units, the horizon offers 100"
        );
    }

    #[test]
    fn test_plan_error_is_transparent() {
        let err = PlanError::from(ExplainError::Empty);
        assert_eq!(
            err.to_string(),
            "explanation is empty after removing the reasoning trace"
        );
    }
}
