//! Schedule-then-explain orchestration.
//!
//! The planner chains the two services: the scheduler runs on the
//! blocking pool, and only after it has finished is the explanation
//! backend called. The two share nothing but the schedule value.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::PlanError;
use crate::explain::{ExplanationBackend, Explainer};
use crate::models::{Schedule, ScheduleEntry, Task};
use crate::scheduler::SequentialScheduler;
use crate::validation::DuplicateName;

/// A scheduled task with its occupied length spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedTask {
    pub task: String,
    pub start: i64,
    pub end: i64,
    /// `end - start + 1`.
    pub duration: i64,
}

impl From<&ScheduleEntry> for PlannedTask {
    fn from(entry: &ScheduleEntry) -> Self {
        Self {
            task: entry.task.clone(),
            start: entry.start,
            end: entry.end,
            duration: entry.duration(),
        }
    }
}

/// Result of `Planner::plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub schedule: Vec<PlannedTask>,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DuplicateName>,
}

/// Runs the scheduler, then explains the result.
#[derive(Debug, Clone)]
pub struct Planner<B> {
    scheduler: SequentialScheduler,
    explainer: Explainer<B>,
}

impl<B: ExplanationBackend> Planner<B> {
    /// Creates a planner.
    pub fn new(scheduler: SequentialScheduler, explainer: Explainer<B>) -> Self {
        Self {
            scheduler,
            explainer,
        }
    }

    /// The scheduler used by this planner.
    pub fn scheduler(&self) -> &SequentialScheduler {
        &self.scheduler
    }

    /// The explainer used by this planner.
    pub fn explainer(&self) -> &Explainer<B> {
        &self.explainer
    }

    /// Schedules `tasks` and explains the schedule.
    pub async fn plan(&self, tasks: Vec<Task>) -> Result<PlanResponse, PlanError> {
        let outcome = self.scheduler.schedule_blocking(tasks).await?;
        let explanation = self.explainer.explain(&outcome.schedule).await?;

        info!(
            tasks = outcome.schedule.len(),
            explanation_len = explanation.len(),
            "plan ready"
        );

        Ok(PlanResponse {
            schedule: planned_tasks(&outcome.schedule),
            explanation,
            warnings: outcome.warnings,
        })
    }
}

/// Converts schedule entries into `PlannedTask`s.
pub fn planned_tasks(schedule: &Schedule) -> Vec<PlannedTask> {
    schedule.iter().map(PlannedTask::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExplainError, ScheduleError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ExplanationBackend for EchoBackend {
        async fn generate(&self, prompt: &str) -> Result<String, ExplainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("<think>x</think>{} lines", prompt.lines().count()))
        }
    }

    fn planner() -> Planner<EchoBackend> {
        Planner::new(
            SequentialScheduler::new(),
            Explainer::new(EchoBackend {
                calls: AtomicUsize::new(0),
            }),
        )
    }

    #[tokio::test]
    async fn test_plan() {
        let planner = planner();
        let response = planner
            .plan(vec![Task::new("A", 3), Task::new("B", 2)])
            .await
            .unwrap();

        assert_eq!(response.schedule.len(), 2);
        assert_eq!(response.schedule[0].duration, 3);
        assert_eq!(response.schedule[1].duration, 2);
        // "Schedule:", 2 entries, blank line, "Explain this schedule."
        assert_eq!(response.explanation, "5 lines");
        assert!(response.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_plan_infeasible_skips_explanation() {
        let planner = planner();
        let err = planner
            .plan(vec![Task::new("A", 60), Task::new("B", 60)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PlanError::Schedule(ScheduleError::Infeasible { .. })
        ));
        assert_eq!(planner.explainer().backend().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_planned_task_duration_is_inclusive() {
        let planned = PlannedTask::from(&ScheduleEntry::new("A", 4, 6));
        assert_eq!(planned.duration, 3);
    }

    #[test]
    fn test_response_omits_empty_warnings() {
        let response = PlanResponse {
            schedule: vec![],
            explanation: "none".into(),
            warnings: vec![],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("warnings").is_none());
    }
}
