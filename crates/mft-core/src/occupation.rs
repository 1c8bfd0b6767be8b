//! Fermi-Dirac occupation and the matching band free-energy kernel.
//!
//! Both functions accept `beta = +inf` and arguments for which `beta * energy`
//! overflows `f64`; they fall back to the zero-temperature step in that regime.

use crate::numeric::{Real, temperature};

/// Fermi-Dirac occupation `1 / (exp(beta * energy) + 1)`.
///
/// Returns exactly `0.5` at `energy == 0` for every beta, including `+inf`.
pub fn fermi(beta: Real, energy: Real) -> Real {
    if energy == 0.0 {
        return 0.5;
    }
    let overflow = beta.is_infinite()
        || beta >= (Real::MAX / energy).abs()
        || (beta * energy).abs() >= Real::MAX.ln();
    if overflow {
        return if energy <= 0.0 { 1.0 } else { 0.0 };
    }
    1.0 / ((beta * energy).exp() + 1.0)
}

/// Sum of occupations over a set of band energies.
pub fn fermi_sum(beta: Real, energies: &[Real]) -> Real {
    energies.iter().map(|&e| fermi(beta, e)).sum()
}

/// `-T ln(1 + exp(-beta * energy))`, finite at `beta = +inf`.
pub fn minus_t_log_one_plus_exp(beta: Real, energy: Real) -> Real {
    let t = temperature(beta);
    let tail = if t == 0.0 {
        0.0
    } else {
        t * (-beta * energy.abs()).exp().ln_1p()
    };
    energy.min(0.0) - tail
}
