//! Free-energy minimization over several starting points.
//!
//! The self-consistency equations have more than one fixed point at low
//! temperature. Each start is solved independently and the converged state
//! with the lowest free energy is kept.

use mft_project::ModelDef;
use mft_solver::SolveOptions;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::run_service::{SolveOutcome, solve_model};

/// `(M, W)` starting values tried by [`minimize_free_energy`].
pub const INITIAL_ORDER: [(f64, f64); 3] = [(0.0, 0.0), (1.0, 1.0), (0.1, 0.01)];

/// Copy of `model` with every site's order parameters set to `(m, w)`.
pub fn with_initial_order(model: &ModelDef, m: f64, w: f64) -> ModelDef {
    let mut model = model.clone();
    match &mut model {
        ModelDef::Cubic(def) => {
            def.m = m;
            def.w = w;
        }
        ModelDef::Dimer(def) => {
            for moment in [&mut def.m01, &mut def.m11, &mut def.m02, &mut def.m12] {
                *moment = m;
            }
            for second in [&mut def.w01, &mut def.w11, &mut def.w02, &mut def.w12] {
                *second = w;
            }
        }
    }
    model
}

/// A start that did not converge, kept alongside the minimum.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedStart {
    pub m: f64,
    pub w: f64,
    pub reason: String,
}

/// Lowest free-energy state over [`INITIAL_ORDER`].
#[derive(Debug, Clone)]
pub struct Minimum {
    pub best: SolveOutcome,
    pub skipped: Vec<SkippedStart>,
}

/// Solve from every start in [`INITIAL_ORDER`] and keep the converged state
/// with the lowest free energy.
///
/// Starts that fail to converge are skipped and reported in
/// [`Minimum::skipped`]. An invalid pin name fails for every start and is
/// returned immediately.
pub fn minimize_free_energy(
    model: &ModelDef,
    options: &SolveOptions,
    pins: &[String],
) -> AppResult<Minimum> {
    minimize_with(model, |start| solve_model(start, options, pins))
}

fn minimize_with<F>(model: &ModelDef, mut solve: F) -> AppResult<Minimum>
where
    F: FnMut(&ModelDef) -> AppResult<SolveOutcome>,
{
    let mut best: Option<SolveOutcome> = None;
    let mut skipped = Vec::new();

    for &(m, w) in &INITIAL_ORDER {
        match solve(&with_initial_order(model, m, w)) {
            Ok(outcome) => {
                debug!(m, w, free_energy = outcome.free_energy(), "start converged");
                if best
                    .as_ref()
                    .is_none_or(|b| outcome.free_energy() < b.free_energy())
                {
                    best = Some(outcome);
                }
            }
            Err(err @ AppError::Model(_)) => return Err(err),
            Err(err) => {
                warn!(m, w, error = %err, "start failed");
                skipped.push(SkippedStart {
                    m,
                    w,
                    reason: err.to_string(),
                });
            }
        }
    }

    match best {
        Some(best) => Ok(Minimum { best, skipped }),
        None => Err(AppError::NoConvergence(
            skipped
                .iter()
                .map(|s| format!("(M={}, W={}): {}", s.m, s.w, s.reason))
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}
