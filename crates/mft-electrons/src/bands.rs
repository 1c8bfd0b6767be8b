//! Band filling and band free energy, per spin.

use crate::bzone::average;
use crate::eigen::HermitianEigensolver;
use mft_core::{fermi_sum, minus_t_log_one_plus_exp};
use mft_model::ElectronicModel;

/// `< sum_a f(eps_a(k)) >_BZ`
pub fn band_filling<M, E>(model: &M, solver: &E) -> f64
where
    M: ElectronicModel,
    E: HermitianEigensolver,
{
    let beta = model.beta();
    average(model.mesh_size(), |k| {
        fermi_sum(beta, &solver.eigenvalues(&model.hamiltonian(k)))
    })
}

/// `< sum_a -T ln(1 + exp(-beta eps_a(k))) >_BZ`
pub fn band_free_energy<M, E>(model: &M, solver: &E) -> f64
where
    M: ElectronicModel,
    E: HermitianEigensolver,
{
    let beta = model.beta();
    average(model.mesh_size(), |k| {
        solver
            .eigenvalues(&model.hamiltonian(k))
            .iter()
            .map(|&e| minus_t_log_one_plus_exp(beta, e))
            .sum()
    })
}
