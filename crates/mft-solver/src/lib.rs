//! Self-consistent mean-field solver.
//!
//! The unknowns are the ionic order parameters (`M`, `W` per site type) and
//! the electronic chemical potential `Mu`. Each has one residual equation
//! comparing its assumed value with the value recomputed from the current
//! state; a Newton iteration with a finite-difference Jacobian drives all
//! residuals to zero.

pub mod cubic;
pub mod dimer;
pub mod error;
pub mod jacobian;
pub mod newton;
pub mod report;
pub mod solve;
pub mod strategy;
pub mod system;

pub use cubic::CubicSystem;
pub use dimer::DimerSystem;
pub use error::{SolverError, SolverResult};
pub use jacobian::DiffHints;
pub use mft_core::Tolerances;
pub use newton::{NewtonConfig, NewtonResult};
pub use report::FinalReport;
pub use solve::{Solution, SolveOptions, solve, solve_cubic, solve_dimer};
pub use strategy::SolveStrategy;
pub use system::MeanFieldSystem;
