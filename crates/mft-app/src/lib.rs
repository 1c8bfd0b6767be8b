//! Application service layer for the mean-field solver.
//!
//! Shared by the CLI: loading parameter files, solving them, choosing the
//! lowest free-energy state among several starts and sampling phase diagrams.

pub mod error;
pub mod minimize;
pub mod phase;
pub mod run_service;

pub use error::{AppError, AppResult};
pub use minimize::{INITIAL_ORDER, Minimum, SkippedStart, minimize_free_energy, with_initial_order};
pub use phase::{PhaseGrid, PhasePoint, model_at, phase_scale, sample_phase};
pub use run_service::{SolveOutcome, SolveRequest, run_solve, solve_model};
