//! Finite difference Jacobian computation.

use crate::error::SolverResult;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Differentiation step and accepted error for one unknown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffHints {
    /// Absolute step
    pub step: f64,
    /// Derivative error above which a column is reported
    pub abs_err: f64,
}

impl Default for DiffHints {
    fn default() -> Self {
        Self {
            step: 1e-6,
            abs_err: 1e-4,
        }
    }
}

/// Compute Jacobian using central finite differences.
///
/// Column `j` uses the absolute step `hints[j].step`. The disagreement
/// between the central and forward quotients estimates the truncation
/// error; columns exceeding `hints[j].abs_err` are logged.
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    hints: &[DiffHints],
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    debug_assert_eq!(hints.len(), n);
    let f_x = f(x)?;
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let dx = hints[j].step;

        let mut x_plus = x.clone();
        x_plus[j] += dx;
        let f_plus = f(&x_plus)?;

        let mut x_minus = x.clone();
        x_minus[j] -= dx;
        let f_minus = f(&x_minus)?;

        let df = (&f_plus - f_minus) / (2.0 * dx);
        let forward = (f_plus - &f_x) / dx;
        let err = (&df - forward).amax();
        if err > hints[j].abs_err {
            debug!(column = j, err, "finite difference error above hint");
        }

        jac.set_column(j, &df);
    }

    Ok(jac)
}
