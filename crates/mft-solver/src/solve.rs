//! High-level solver interface.

use crate::cubic::CubicSystem;
use crate::dimer::DimerSystem;
use crate::error::{SolverError, SolverResult};
use crate::jacobian::{DiffHints, central_difference_jacobian};
use crate::newton::{NewtonConfig, NewtonResult, newton_solve};
use crate::report::FinalReport;
use crate::strategy::SolveStrategy;
use crate::system::MeanFieldSystem;
use mft_core::Tolerances;
use mft_model::{Binding, CubicEnv, CubicVar, DimerEnv, DimerVar, VarRole, Variable};
use nalgebra::DVector;
use std::cell::RefCell;
use tracing::{debug, info, warn};

const MAX_OUTER_ITER: usize = 20;

/// Solver options shared by every model.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOptions {
    /// Residual norms accepted as converged
    pub tolerances: Tolerances,
    pub strategy: SolveStrategy,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            strategy: SolveStrategy::default(),
        }
    }
}

impl SolveOptions {
    /// Default strategy, converging to `abs_tol` only.
    pub fn absolute(abs_tol: f64) -> Self {
        Self {
            tolerances: Tolerances::absolute(abs_tol),
            ..Self::default()
        }
    }
}

/// Converged values of the free unknowns.
#[derive(Debug, Clone)]
pub struct Solution<V> {
    pub vars: Vec<V>,
    pub values: DVector<f64>,
    pub residual_norm: f64,
    pub iterations: usize,
}

impl<V: Copy + PartialEq> Solution<V> {
    pub fn value(&self, var: V) -> Option<f64> {
        self.vars
            .iter()
            .position(|&v| v == var)
            .map(|i| self.values[i])
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Solve the equation set of `system` for its free unknowns.
///
/// This function:
/// 1. Pins each variable in `pinned` to exactly zero and drops its equation
/// 2. Drops the chemical potential when the electronic sector is off
/// 3. Runs Newton over the remaining unknowns, combined or staged
///
/// On success the state holds the converged values. On failure the state
/// holds whatever the last evaluation wrote and should be discarded.
pub fn solve<S: MeanFieldSystem>(
    system: &mut S,
    options: &SolveOptions,
    pinned: &[S::Var],
) -> SolverResult<Solution<S::Var>> {
    options.tolerances.validate()?;
    for &var in pinned {
        if var.role() != VarRole::OrderParameter {
            return Err(SolverError::ProblemSetup {
                what: format!("Only order parameters can be pinned, got {}", var.name()),
            });
        }
        var.set(system.state_mut(), 0.0);
    }

    let ions_only = system.ions_only();
    let free: Vec<S::Var> = system
        .unknowns()
        .into_iter()
        .filter(|v| !pinned.contains(v))
        .filter(|v| !(ions_only && v.role() == VarRole::ChemicalPotential))
        .collect();

    if free.is_empty() {
        warn!("no free unknowns; nothing to solve");
        return Ok(Solution {
            vars: free,
            values: DVector::zeros(0),
            residual_norm: 0.0,
            iterations: 0,
        });
    }

    let (mu_stage, rest): (Vec<S::Var>, Vec<S::Var>) = free
        .iter()
        .copied()
        .partition(|v| v.role() == VarRole::ChemicalPotential);
    let staged = options.strategy.uses_stages() && !mu_stage.is_empty() && !rest.is_empty();
    let config = options.strategy.to_newton_config(options.tolerances);

    let cell = RefCell::new(system);
    let mut iterations = 0;

    let residual_norm = if staged {
        let initial_norm = cell.borrow_mut().residuals(&free)?.norm();
        let mut converged_norm = None;
        for outer in 0..MAX_OUTER_ITER {
            for stage in [&mu_stage, &rest] {
                iterations += newton_stage(&cell, stage, &config)?.iterations;
            }
            let norm = cell.borrow_mut().residuals(&free)?.norm();
            debug!(outer, residual_norm = norm, "staged cycle");
            if options.tolerances.accepts(norm, initial_norm) {
                converged_norm = Some(norm);
                break;
            }
        }
        converged_norm.ok_or_else(|| SolverError::ConvergenceFailed {
            what: format!("Staged solve did not converge in {} cycles", MAX_OUTER_ITER),
        })?
    } else {
        let result = newton_stage(&cell, &free, &config)?;
        iterations += result.iterations;
        result.residual_norm
    };

    let system = cell.into_inner();
    let values = Binding::new(free.clone()).read(system.state());
    info!(
        strategy = options.strategy.as_str(),
        iterations, residual_norm, "mean-field solve converged"
    );

    Ok(Solution {
        vars: free,
        values,
        residual_norm,
        iterations,
    })
}

/// One Newton solve over `vars`, leaving the result written into the state.
fn newton_stage<S: MeanFieldSystem>(
    cell: &RefCell<&mut S>,
    vars: &[S::Var],
    config: &NewtonConfig,
) -> SolverResult<NewtonResult> {
    let binding = Binding::new(vars.to_vec());
    let (x0, hints) = {
        let system = cell.borrow();
        let hints: Vec<DiffHints> = vars.iter().map(|&v| system.hints(v)).collect();
        (binding.read(system.state()), hints)
    };

    let residual_fn = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
        let mut system = cell.borrow_mut();
        binding.write(system.state_mut(), x);
        system.residuals(vars)
    };
    let jacobian_fn = |x: &DVector<f64>| central_difference_jacobian(x, &residual_fn, &hints);

    let result = newton_solve(x0, &residual_fn, jacobian_fn, config)?;
    binding.write(cell.borrow_mut().state_mut(), &result.x);
    Ok(result)
}

/// Solve the cubic model in place and report the final state.
pub fn solve_cubic(
    env: &mut CubicEnv,
    options: &SolveOptions,
    pinned: &[CubicVar],
) -> SolverResult<(Solution<CubicVar>, FinalReport)> {
    env.validate()?;
    let mut system = CubicSystem::new(env);
    let solution = solve(&mut system, options, pinned)?;
    let report = system.final_report()?;
    Ok((solution, report))
}

/// Solve the dimer model in place and report the final state.
pub fn solve_dimer(
    env: &mut DimerEnv,
    options: &SolveOptions,
    pinned: &[DimerVar],
) -> SolverResult<(Solution<DimerVar>, FinalReport)> {
    env.validate()?;
    let mut system = DimerSystem::new(env);
    let solution = solve(&mut system, options, pinned)?;
    let report = system.final_report()?;
    Ok((solution, report))
}
