use crate::{CoreError, CoreResult};

/// Floating point type used throughout the engine
pub type Real = f64;

/// Convergence tolerances on a residual norm.
///
/// A residual is accepted when its norm is below `abs`, or below `rel`
/// times the norm at the starting point. `rel = 0` leaves only the
/// absolute test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { abs: 1e-6, rel: 0.0 }
    }
}

impl Tolerances {
    pub fn absolute(abs: Real) -> Self {
        Self { abs, rel: 0.0 }
    }

    /// `abs` must be positive, `rel` non-negative, both finite.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.abs.is_finite() && self.abs > 0.0) {
            return Err(CoreError::InvalidTolerance {
                what: "absolute",
                value: self.abs,
            });
        }
        if !(self.rel.is_finite() && self.rel >= 0.0) {
            return Err(CoreError::InvalidTolerance {
                what: "relative",
                value: self.rel,
            });
        }
        Ok(())
    }

    pub fn accepts(&self, norm: Real, initial_norm: Real) -> bool {
        norm < self.abs || norm < self.rel * initial_norm
    }
}

pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Inverse temperature must be finite positive or `+inf` (zero temperature).
pub fn ensure_beta(beta: Real) -> CoreResult<Real> {
    if beta.is_nan() || beta <= 0.0 {
        return Err(CoreError::InvalidBeta { value: beta });
    }
    Ok(beta)
}

/// Temperature `1/beta`, exactly zero at `beta = +inf`.
pub fn temperature(beta: Real) -> Real {
    if beta.is_infinite() { 0.0 } else { 1.0 / beta }
}
