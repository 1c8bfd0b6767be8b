//! Phase-diagram sampling over a grid of anisotropy and temperature.
//!
//! Both axes are dimensionless ratios of the model's exchange scale: `qj_ion`
//! for the cubic model and `4 Jb0` for the dimer model. Every grid point is
//! minimized independently on the rayon pool.

use mft_model::CubicEnv;
use mft_project::{CubicDef, ModelDef};
use mft_solver::SolveOptions;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::minimize::minimize_free_energy;
use crate::run_service::SolveOutcome;

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseGrid {
    pub num_b: usize,
    pub num_t: usize,
    pub b_range: (f64, f64),
    pub t_range: (f64, f64),
}

impl PhaseGrid {
    pub fn new(num_b: usize, num_t: usize) -> Self {
        Self {
            num_b,
            num_t,
            b_range: (0.01, 1.2),
            t_range: (0.01, 0.8),
        }
    }

    /// `(b_ratio, t_ratio)` pairs, temperature varying fastest.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let bs = lin_space(self.b_range, self.num_b);
        let ts = lin_space(self.t_range, self.num_t);
        bs.iter()
            .flat_map(|&b| ts.iter().map(move |&t| (b, t)))
            .collect()
    }
}

fn lin_space((lo, hi): (f64, f64), n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n).map(|i| lo + step * i as f64).collect()
        }
    }
}

#[derive(Debug, Clone)]
pub struct PhasePoint {
    pub b_ratio: f64,
    pub t_ratio: f64,
    /// `None` when no starting point converged
    pub outcome: Option<SolveOutcome>,
}

/// Exchange scale the grid ratios are measured in.
pub fn phase_scale(model: &ModelDef) -> AppResult<f64> {
    let scale = match model {
        ModelDef::Cubic(def) => CubicEnv::from(def).qj_ion(),
        ModelDef::Dimer(def) => 4.0 * def.jb0,
    };
    if !scale.is_finite() || scale <= 0.0 {
        return Err(AppError::InvalidInput(format!(
            "phase diagram needs a positive exchange scale, got {scale}"
        )));
    }
    Ok(scale)
}

/// Copy of `model` placed at one grid point.
pub fn model_at(model: &ModelDef, scale: f64, b_ratio: f64, t_ratio: f64) -> AppResult<ModelDef> {
    let beta = 1.0 / (t_ratio * scale);
    match model {
        ModelDef::Cubic(def) => Ok(ModelDef::Cubic(CubicDef {
            b: b_ratio * scale,
            beta,
            ..def.clone()
        })),
        ModelDef::Dimer(def) => {
            if def.bzz0 == 0.0 {
                return Err(AppError::InvalidInput(
                    "dimer phase diagram needs a nonzero Bzz0 to fix the Bxy0/Bzz0 ratio"
                        .to_string(),
                ));
            }
            let ratio = def.bxy0 / def.bzz0;
            let bzz0 = b_ratio * scale;
            let mut def = def.clone();
            def.bzz0 = bzz0;
            def.bxy0 = ratio * bzz0;
            def.beta = beta;
            Ok(ModelDef::Dimer(def))
        }
    }
}

pub fn sample_phase(
    model: &ModelDef,
    grid: &PhaseGrid,
    options: &SolveOptions,
) -> AppResult<Vec<PhasePoint>> {
    let scale = phase_scale(model)?;
    let points = grid
        .points()
        .into_par_iter()
        .map(|(b_ratio, t_ratio)| {
            let at = model_at(model, scale, b_ratio, t_ratio)?;
            let outcome = match minimize_free_energy(&at, options, &[]) {
                Ok(minimum) => Some(minimum.best),
                Err(AppError::NoConvergence(what)) => {
                    warn!(b_ratio, t_ratio, %what, "phase point did not converge");
                    None
                }
                Err(err) => return Err(err),
            };
            Ok(PhasePoint {
                b_ratio,
                t_ratio,
                outcome,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let converged = points.iter().filter(|p| p.outcome.is_some()).count();
    info!(total = points.len(), converged, "phase sampling finished");
    Ok(points)
}
