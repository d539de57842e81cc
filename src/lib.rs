//! Sequential task scheduling on a constraint model.
//!
//! Places an ordered list of named, fixed-duration tasks on a bounded
//! horizon so that each task starts only after the previous one ends,
//! and explains the resulting schedule through a language model.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Schedule`, `ScheduleEntry`, `Horizon`
//! - **`validation`**: Input checks (durations, names, duplicate-name warnings)
//! - **`solver`**: General-purpose integer CP solver (propagation + search)
//! - **`cp`**: Maps a task sequence onto a `CpModel`
//! - **`scheduler`**: `SequentialScheduler`, the entry point of the core
//! - **`explain`**: Prompt rendering, LLM backend, reasoning-trace removal
//! - **`planner`**: Schedule-then-explain orchestration
//! - **`server`**: HTTP endpoints over the above
//! - **`config`**: TOML configuration with environment overrides
//!
//! # Architecture
//!
//! The scheduling core (`models` → `validation` → `cp` → `solver`) is
//! synchronous and stateless per request. The explanation side is async
//! and network-bound. They meet only in `planner`, through the
//! `Schedule` value.
//!
//! # References
//!
//! - Baptiste et al. (2001), "Constraint-Based Scheduling"
//! - Dechter, Meiri & Pearl (1991), "Temporal Constraint Networks"

pub mod config;
pub mod cp;
pub mod error;
pub mod explain;
pub mod models;
pub mod planner;
pub mod scheduler;
pub mod server;
pub mod solver;
pub mod validation;

pub use error::{ConfigError, ExplainError, PlanError, ScheduleError};
