//! Input validation for scheduling requests.
//!
//! Checks the task list before any model is built. Detects:
//! - Empty task names
//! - Non-positive durations
//! - Duplicate task names (non-fatal, reported as warnings)
//!
//! Externally supplied schedule entries (to be explained rather than
//! computed) are checked for empty names and `end < start`.
//!
//! Every problem is collected; validation never stops at the first one.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{ScheduleEntry, Task};

/// Validation result: warnings on success, every error on failure.
pub type ValidationResult = Result<Vec<DuplicateName>, Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Position of the offending task in the request.
    pub position: usize,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorKind {
    /// Task name is empty or whitespace.
    EmptyName,
    /// Duration is zero or negative.
    NonPositiveDuration,
    /// Schedule entry ends before it starts.
    InvertedInterval,
}

/// Two or more tasks share a name.
///
/// The schedule is still computed positionally, but looking entries up
/// by name on the result is ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateName {
    /// The repeated name.
    pub name: String,
    /// Positions (in request order) of every task with this name.
    pub positions: Vec<usize>,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, position: usize, message: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task #{}: {}", self.position, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl fmt::Display for DuplicateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "task name '{}' is used at positions {:?}",
            self.name, self.positions
        )
    }
}

/// Validates a scheduling request.
///
/// Checks:
/// 1. Every task name is non-empty
/// 2. Every duration is positive
/// 3. Task names are unique (warning only)
///
/// # Returns
/// `Ok(warnings)` if no error was found, `Err(errors)` with all detected issues.
pub fn validate_tasks(tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();

    for (position, task) in tasks.iter().enumerate() {
        if task.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                position,
                "task name must not be empty",
            ));
        }

        if task.duration <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveDuration,
                position,
                format!(
                    "task '{}' has non-positive duration {}",
                    task.name, task.duration
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(find_duplicate_names(tasks))
    } else {
        Err(errors)
    }
}

/// Validates schedule entries received from outside the scheduler.
pub fn validate_entries(entries: &[ScheduleEntry]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (position, entry) in entries.iter().enumerate() {
        if entry.task.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                position,
                "task name must not be empty",
            ));
        }

        if entry.end < entry.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedInterval,
                position,
                format!(
                    "task '{}' ends at {} before it starts at {}",
                    entry.task, entry.end, entry.start
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Groups repeated names, in order of first appearance.
fn find_duplicate_names(tasks: &[Task]) -> Vec<DuplicateName> {
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for (position, task) in tasks.iter().enumerate() {
        let slot = positions.entry(task.name.as_str()).or_default();
        if slot.is_empty() {
            order.push(task.name.as_str());
        }
        slot.push(position);
    }

    order
        .into_iter()
        .filter_map(|name| {
            let found = &positions[name];
            (found.len() > 1).then(|| DuplicateName {
                name: name.to_string(),
                positions: found.clone(),
            })
        })
        .collect()
}
