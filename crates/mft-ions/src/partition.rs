//! Partition function and moments over enumerated configurations.

use crate::configs::ConfigurationSet;
use crate::error::{IonError, IonResult};
use mft_core::{ensure_beta, temperature};

/// Thermal sums from one pass over the configurations.
///
/// `z` is the partition function of energies shifted by `h_min`, so the
/// unshifted partition function is `z * exp(-beta * h_min)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionSums<const N: usize> {
    pub beta: f64,
    pub h_min: f64,
    pub z: f64,
    /// `<S_i>`
    pub first: [f64; N],
    /// `<S_i^2>`
    pub second: [f64; N],
}

impl<const N: usize> PartitionSums<N> {
    /// `-T ln Z`, equal to the ground-state energy at zero temperature.
    pub fn free_energy(&self) -> f64 {
        self.h_min - temperature(self.beta) * self.z.ln()
    }
}

/// Boltzmann weight relative to the minimum energy.
///
/// Exactly 1 for configurations at the minimum, for every beta.
fn shifted_weight(beta: f64, excess: f64) -> f64 {
    if excess == 0.0 {
        1.0
    } else {
        (-beta * excess).exp()
    }
}

pub(crate) fn boltzmann_sums<const N: usize>(
    beta: f64,
    configs: &[[f64; N]],
    energies: &[f64],
) -> IonResult<PartitionSums<N>> {
    ensure_beta(beta)?;
    let mut h_min = f64::INFINITY;
    for &e in energies {
        if !e.is_finite() {
            return Err(IonError::NonFiniteEnergy { value: e });
        }
        h_min = h_min.min(e);
    }

    let mut z = 0.0;
    let mut first = [0.0; N];
    let mut second = [0.0; N];
    for (spins, &e) in configs.iter().zip(energies) {
        let w = shifted_weight(beta, e - h_min);
        z += w;
        for i in 0..N {
            first[i] += spins[i] * w;
            second[i] += spins[i] * spins[i] * w;
        }
    }
    for i in 0..N {
        first[i] /= z;
        second[i] /= z;
    }

    Ok(PartitionSums {
        beta,
        h_min,
        z,
        first,
        second,
    })
}

/// Enumerates `3^N` configurations once and evaluates thermal sums for any
/// configuration energy.
#[derive(Debug, Clone, Default)]
pub struct PartitionEngine<const N: usize> {
    configs: ConfigurationSet<N>,
}

impl<const N: usize> PartitionEngine<N> {
    pub fn new() -> Self {
        Self {
            configs: ConfigurationSet::new(),
        }
    }

    pub fn configurations(&self) -> &ConfigurationSet<N> {
        &self.configs
    }

    pub fn evaluate<F>(&self, beta: f64, energy: F) -> IonResult<PartitionSums<N>>
    where
        F: Fn(&[f64; N]) -> f64,
    {
        let energies: Vec<f64> = self.configs.iter().map(&energy).collect();
        boltzmann_sums(beta, self.configs.as_slice(), &energies)
    }
}
