//! Solve strategy: how the unknowns are grouped into Newton solves.
//!
//! - `Combined` solves every free unknown in one Newton iteration.
//! - `Staged` alternates between the chemical potential alone and the
//!   remaining order parameters until the full residual is small.
//!
//! Staging helps when the filling equation is much stiffer than the ionic
//! equations, e.g. at low temperature.

use crate::error::SolverError;
use crate::newton::NewtonConfig;
use mft_core::Tolerances;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolveStrategy {
    #[default]
    Combined,
    Staged,
}

impl SolveStrategy {
    /// Name used in logs and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            SolveStrategy::Combined => "combined",
            SolveStrategy::Staged => "staged",
        }
    }

    /// Newton configuration for one stage, converging to `tolerances`.
    pub fn to_newton_config(&self, tolerances: Tolerances) -> NewtonConfig {
        match self {
            SolveStrategy::Combined => NewtonConfig {
                max_iterations: 100,
                abs_tol: tolerances.abs,
                rel_tol: tolerances.rel,
                line_search_beta: 0.5,
                max_line_search_iters: 20,
            },
            // Each stage runs inside an outer loop, so fewer steps suffice.
            SolveStrategy::Staged => NewtonConfig {
                max_iterations: 50,
                abs_tol: tolerances.abs,
                rel_tol: tolerances.rel,
                line_search_beta: 0.5,
                max_line_search_iters: 20,
            },
        }
    }

    pub fn uses_stages(&self) -> bool {
        matches!(self, SolveStrategy::Staged)
    }
}

impl FromStr for SolveStrategy {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "combined" => Ok(SolveStrategy::Combined),
            "staged" => Ok(SolveStrategy::Staged),
            other => Err(SolverError::ProblemSetup {
                what: format!("Unknown solve strategy '{}'", other),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configs_carry_tolerance() {
        let tolerances = Tolerances { abs: 1e-8, rel: 1e-3 };
        let config = SolveStrategy::Staged.to_newton_config(tolerances);
        assert_eq!(config.abs_tol, 1e-8);
        assert_eq!(config.rel_tol, 1e-3);
        assert!(
            SolveStrategy::Combined.to_newton_config(tolerances).max_iterations
                > config.max_iterations
        );
    }

    #[test]
    fn strategy_names_are_stable() {
        assert_eq!(SolveStrategy::Combined.as_str(), "combined");
        assert_eq!(SolveStrategy::Staged.as_str(), "staged");
        assert_eq!("Staged".parse::<SolveStrategy>().unwrap(), SolveStrategy::Staged);
        assert!("both".parse::<SolveStrategy>().is_err());
    }

    #[test]
    fn default_is_combined() {
        assert_eq!(SolveStrategy::default(), SolveStrategy::Combined);
        assert!(!SolveStrategy::Combined.uses_stages());
        assert!(SolveStrategy::Staged.uses_stages());
    }
}
