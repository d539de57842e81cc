//! Natural-language schedule explanations.
//!
//! An `Explainer` renders a finished schedule into a prompt, sends it to
//! an `ExplanationBackend` and removes the reasoning trace from the raw
//! answer. It holds no state between calls and never touches the
//! scheduler.

mod ollama;
mod prompt;
mod reasoning;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ExplainError;
use crate::models::Schedule;

pub use ollama::OllamaBackend;
pub use prompt::{format_schedule, render_prompt, DEFAULT_PROMPT_TEMPLATE, SCHEDULE_PLACEHOLDER};
pub use reasoning::{
    strip_reasoning_trace, ReasoningMarkers, DEFAULT_REASONING_CLOSE, DEFAULT_REASONING_OPEN,
};

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default model name.
pub const DEFAULT_MODEL: &str = "planning-explainer";

/// Default backend request timeout (seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// A language-model inference service.
#[async_trait]
pub trait ExplanationBackend: Send + Sync {
    /// Returns the raw model output for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, ExplainError>;
}

/// Explainer settings, loadable from the `[explainer]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    /// Backend base URL.
    pub base_url: String,
    /// Model name.
    pub model: String,
    /// Request timeout (seconds).
    pub timeout_secs: u64,
    /// Prompt template; must contain `{schedule}`.
    pub prompt_template: String,
    /// Reasoning-trace marker pair.
    pub reasoning: ReasoningMarkers,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            reasoning: ReasoningMarkers::default(),
        }
    }
}

impl ExplainerConfig {
    /// Checks template and marker settings.
    pub fn validate(&self) -> Result<(), String> {
        if !self.prompt_template.contains(SCHEDULE_PLACEHOLDER) {
            return Err(format!(
                "prompt_template must contain the {SCHEDULE_PLACEHOLDER} placeholder"
            ));
        }
        if self.reasoning.open.is_empty() || self.reasoning.close.is_empty() {
            return Err("reasoning markers must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be positive".to_string());
        }
        Ok(())
    }
}

/// Turns schedules into prose through a backend.
#[derive(Debug, Clone)]
pub struct Explainer<B> {
    backend: B,
    template: String,
    markers: ReasoningMarkers,
}

impl<B: ExplanationBackend> Explainer<B> {
    /// Creates an explainer with the default template and markers.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            markers: ReasoningMarkers::default(),
        }
    }

    /// Sets the prompt template.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Sets the reasoning marker pair.
    pub fn with_markers(mut self, markers: ReasoningMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The prompt that `explain` would send for `schedule`.
    pub fn prompt_for(&self, schedule: &Schedule) -> String {
        render_prompt(&self.template, schedule)
    }

    /// Explains a schedule.
    pub async fn explain(&self, schedule: &Schedule) -> Result<String, ExplainError> {
        let prompt = self.prompt_for(schedule);
        let raw = self.backend.generate(&prompt).await?;
        debug!(raw_len = raw.len(), "backend answered");

        let cleaned = strip_reasoning_trace(&raw, &self.markers)
            .inspect_err(|err| warn!(error = %err, "could not strip reasoning trace"))?;

        if cleaned.is_empty() {
            return Err(ExplainError::Empty);
        }
        Ok(cleaned)
    }
}

impl Explainer<OllamaBackend> {
    /// Creates an Ollama-backed explainer from settings.
    pub fn from_config(config: &ExplainerConfig) -> Result<Self, ExplainError> {
        Ok(Self::new(OllamaBackend::new(config)?)
            .with_template(config.prompt_template.clone())
            .with_markers(config.reasoning.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleEntry;
    use std::sync::Mutex;

    /// Returns a canned answer and records the prompts it received.
    struct CannedBackend {
        answer: String,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedBackend {
        fn new(answer: &str) -> Self {
            Self {
                answer: answer.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ExplanationBackend for CannedBackend {
        async fn generate(&self, prompt: &str) -> Result<String, ExplainError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.answer.clone())
        }
    }

    fn sample_schedule() -> Schedule {
        Schedule::from(vec![
            ScheduleEntry::new("A", 1, 3),
            ScheduleEntry::new("B", 4, 5),
        ])
    }

    #[tokio::test]
    async fn test_explain_strips_trace() {
        let explainer = Explainer::new(CannedBackend::new(
            "<think>A first, then B.</think>\n\nA runs days 1-3, B runs days 4-5.",
        ));
        let text = explainer.explain(&sample_schedule()).await.unwrap();
        assert_eq!(text, "A runs days 1-3, B runs days 4-5.");

        let prompts = explainer.backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- A: start 1, end 3 (3 units)"));
    }

    #[tokio::test]
    async fn test_explain_custom_template_and_markers() {
        let explainer = Explainer::new(CannedBackend::new("<<x>> ok"))
            .with_template("Plan {schedule} ?")
            .with_markers(ReasoningMarkers::new("<<", ">>"));

        assert_eq!(explainer.explain(&sample_schedule()).await.unwrap(), "ok");
        assert!(explainer.prompt_for(&Schedule::new()).starts_with("Plan (no tasks)"));
    }

    #[tokio::test]
    async fn test_explain_empty_after_strip() {
        let explainer = Explainer::new(CannedBackend::new("<think>only thoughts</think>   "));
        let err = explainer.explain(&sample_schedule()).await.unwrap_err();
        assert!(matches!(err, ExplainError::Empty));
    }

    #[tokio::test]
    async fn test_explain_unmatched_marker() {
        let explainer = Explainer::new(CannedBackend::new("<think>cut off"));
        let err = explainer.explain(&sample_schedule()).await.unwrap_err();
        assert!(matches!(err, ExplainError::UnmatchedDelimiter { .. }));
    }

    #[tokio::test]
    async fn test_explain_through_ollama() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/generate")
            .with_status(200)
            .with_body(r#"{"response":"<think>...</think> Two tasks, back to back.","done":true}"#)
            .create_async()
            .await;

        let config = ExplainerConfig {
            base_url: server.url(),
            ..ExplainerConfig::default()
        };
        let explainer = Explainer::from_config(&config).unwrap();
        let text = explainer.explain(&sample_schedule()).await.unwrap();
        assert_eq!(text, "Two tasks, back to back.");
    }

    #[test]
    fn test_config_validation() {
        assert!(ExplainerConfig::default().validate().is_ok());

        let no_placeholder = ExplainerConfig {
            prompt_template: "Explain.".into(),
            ..ExplainerConfig::default()
        };
        assert!(no_placeholder.validate().is_err());

        let empty_marker = ExplainerConfig {
            reasoning: ReasoningMarkers::new("", "</think>"),
            ..ExplainerConfig::default()
        };
        assert!(empty_marker.validate().is_err());
    }
}
