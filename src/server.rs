//! HTTP endpoints.
//!
//! | Route | Body | Response |
//! |-------|------|----------|
//! | `GET /` | | `{ "message": ... }` |
//! | `POST /solve` | `[{ name, duration }]` | `[{ task, start, end }]` |
//! | `POST /explain` | `{ planning: [{ task, start, end }] }` | `{ explanation }` |
//! | `POST /plan` | `[{ name, duration }]` | `{ schedule, explanation }` |
//!
//! Errors are returned as `{ "error": ..., "details": ... }`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::{ExplainError, PlanError, ScheduleError};
use crate::explain::{ExplanationBackend, Explainer, OllamaBackend};
use crate::models::{Schedule, ScheduleEntry, Task};
use crate::planner::{PlanResponse, Planner};
use crate::scheduler::SequentialScheduler;
use crate::validation::validate_entries;

/// Body of `POST /explain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub planning: Vec<ScheduleEntry>,
}

/// Response of `POST /explain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub explanation: String,
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

/// Error returned by a handler.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Schedule(ScheduleError),
    Explain(ExplainError),
}

impl From<ScheduleError> for ApiError {
    fn from(err: ScheduleError) -> Self {
        Self::Schedule(err)
    }
}

impl From<ExplainError> for ApiError {
    fn from(err: ExplainError) -> Self {
        Self::Explain(err)
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::Schedule(e) => Self::Schedule(e),
            PlanError::Explain(e) => Self::Explain(e),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_and_label(&self) -> (StatusCode, &'static str) {
        match self {
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "malformed request"),
            Self::Schedule(ScheduleError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "invalid tasks")
            }
            Self::Schedule(ScheduleError::Infeasible { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "no feasible schedule")
            }
            Self::Schedule(ScheduleError::Timeout { .. }) => {
                (StatusCode::GATEWAY_TIMEOUT, "solver timed out")
            }
            Self::Schedule(ScheduleError::InvalidConfig(_) | ScheduleError::Interrupted(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "scheduler failure")
            }
            Self::Explain(_) => (StatusCode::BAD_GATEWAY, "explanation failed"),
        }
    }

    fn details(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Schedule(e) => e.to_string(),
            Self::Explain(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, label) = self.status_and_label();
        let details = self.details();
        if status.is_server_error() {
            error!(%status, %details, "request failed");
        }
        let body = ErrorBody {
            error: label.to_string(),
            details,
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the router around a planner.
pub fn router<B>(planner: Planner<B>) -> Router
where
    B: ExplanationBackend + 'static,
{
    Router::new()
        .route("/", get(health))
        .route("/solve", post(solve::<B>))
        .route("/explain", post(explain::<B>))
        .route("/plan", post(plan::<B>))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(planner))
}

/// Binds and serves until the process is stopped.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let scheduler = SequentialScheduler::with_config(config.scheduler.clone());
    let explainer = Explainer::<OllamaBackend>::from_config(&config.explainer)?;
    let app = router(Planner::new(scheduler, explainer));

    let listener = TcpListener::bind(&config.server.bind_addr).await?;
    info!(
        addr = %config.server.bind_addr,
        ollama = %config.explainer.base_url,
        model = %config.explainer.model,
        "server listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "solver is running" }))
}

async fn solve<B: ExplanationBackend + 'static>(
    State(planner): State<Arc<Planner<B>>>,
    payload: Result<Json<Vec<Task>>, JsonRejection>,
) -> Result<Json<Schedule>, ApiError> {
    let Json(tasks) = payload?;
    let outcome = planner.scheduler().schedule_blocking(tasks).await?;
    Ok(Json(outcome.schedule))
}

async fn explain<B: ExplanationBackend + 'static>(
    State(planner): State<Arc<Planner<B>>>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Json<ExplainResponse>, ApiError> {
    let Json(request) = payload?;
    validate_entries(&request.planning).map_err(ScheduleError::Validation)?;
    let schedule = Schedule::from(request.planning);
    let explanation = planner.explainer().explain(&schedule).await?;
    Ok(Json(ExplainResponse { explanation }))
}

async fn plan<B: ExplanationBackend + 'static>(
    State(planner): State<Arc<Planner<B>>>,
    payload: Result<Json<Vec<Task>>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
    let Json(tasks) = payload?;
    Ok(Json(planner.plan(tasks).await?))
}
