//! General-purpose integer constraint solver.
//!
//! Models are built from integer variables with interval domains and
//! difference constraints, then solved by propagation and depth-first
//! search. Nothing here knows about tasks or schedules; `crate::cp`
//! maps the scheduling domain onto this layer.
//!
//! # Components
//!
//! - **`CpModel`**: declarative model (variables, constraints, objective)
//! - **`CpSolver`**: solver trait, implemented by `SearchSolver`
//! - **`SolverConfig`**: node and wall-clock budgets, value ordering
//! - **`CpSolution`**: tagged outcome (`SolveStatus`) plus values

mod model;
mod propagate;
mod search;

pub use model::{Constraint, CpModel, IntVar, Objective, VarId};
pub use search::{CpSolution, CpSolver, SearchSolver, SolveStatus, SolverConfig, ValueSelection};
