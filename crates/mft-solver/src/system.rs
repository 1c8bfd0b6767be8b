//! The residual equation set seen by the solver driver.

use crate::error::SolverResult;
use crate::jacobian::DiffHints;
use crate::report::FinalReport;
use mft_model::Variable;
use nalgebra::DVector;
use std::hash::Hash;

/// A set of self-consistency equations over a mutable model state.
///
/// Every unknown owns exactly one equation, identified by the unknown
/// itself. Residuals are `assumed - recomputed` and are evaluated at the
/// current state; the driver writes trial values through a
/// [`mft_model::Binding`] before each evaluation.
pub trait MeanFieldSystem {
    type State;
    type Var: Variable<Self::State> + Hash;

    fn state(&self) -> &Self::State;

    fn state_mut(&mut self) -> &mut Self::State;

    /// All unknowns of the model in canonical order.
    fn unknowns(&self) -> Vec<Self::Var>;

    /// True when the electronic sector is switched off.
    fn ions_only(&self) -> bool;

    /// Residuals of the equations for `eqs`, in the same order.
    fn residuals(&mut self, eqs: &[Self::Var]) -> SolverResult<DVector<f64>>;

    fn hints(&self, _var: Self::Var) -> DiffHints {
        DiffHints::default()
    }

    /// Expectation values and free energy at the current state.
    fn final_report(&mut self) -> SolverResult<FinalReport>;
}
