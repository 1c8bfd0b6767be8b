//! Solve execution service.

use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use mft_model::{CubicEnv, CubicVar, DimerEnv, DimerVar, ModelError};
use mft_project::{CubicDef, DimerDef, FinalDef, ModelDef};
use mft_solver::{FinalReport, SolveOptions, solve_cubic, solve_dimer};
use tracing::info;

use crate::error::AppResult;

/// Request to solve one parameter file.
pub struct SolveRequest<'a> {
    pub input_path: &'a Path,
    pub output_path: &'a Path,
    pub options: SolveOptions,
    /// Names of order parameters held at zero (`M`, `W01`, ...)
    pub pins: Vec<String>,
    /// Force the electronic sector off regardless of the file
    pub ions_only: bool,
}

/// A converged state together with its derived quantities.
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub result: FinalDef,
    pub iterations: usize,
    pub residual_norm: f64,
}

impl SolveOutcome {
    pub fn free_energy(&self) -> f64 {
        self.result.free_energy
    }

    pub fn expectation(&self, name: &str) -> Option<f64> {
        self.result
            .expectations
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, v)| v)
    }
}

fn parse_pins<V: FromStr<Err = ModelError>>(names: &[String]) -> AppResult<Vec<V>> {
    names
        .iter()
        .map(|name| Ok(name.parse::<V>()?))
        .collect()
}

fn final_def(model: ModelDef, report: &FinalReport) -> FinalDef {
    FinalDef {
        model,
        expectations: report
            .expectations
            .iter()
            .map(|&(name, v)| (name.to_string(), v))
            .collect(),
        free_energy: report.free_energy,
    }
}

/// Solve `model` starting from its stored order parameters.
pub fn solve_model(
    model: &ModelDef,
    options: &SolveOptions,
    pins: &[String],
) -> AppResult<SolveOutcome> {
    match model {
        ModelDef::Cubic(def) => {
            let mut env = CubicEnv::from(def);
            let pins = parse_pins::<CubicVar>(pins)?;
            let (solution, report) = solve_cubic(&mut env, options, &pins)?;
            Ok(SolveOutcome {
                result: final_def(ModelDef::Cubic(CubicDef::from(&env)), &report),
                iterations: solution.iterations,
                residual_norm: solution.residual_norm,
            })
        }
        ModelDef::Dimer(def) => {
            let mut env = DimerEnv::from(def);
            let pins = parse_pins::<DimerVar>(pins)?;
            let (solution, report) = solve_dimer(&mut env, options, &pins)?;
            Ok(SolveOutcome {
                result: final_def(ModelDef::Dimer(DimerDef::from(&env)), &report),
                iterations: solution.iterations,
                residual_norm: solution.residual_norm,
            })
        }
    }
}

/// Load, solve and write the final state of one parameter file.
pub fn run_solve(request: &SolveRequest) -> AppResult<SolveOutcome> {
    let start = Instant::now();
    let mut model = mft_project::load_path(request.input_path)?;
    if request.ions_only {
        model.set_ions_only(true);
    }
    let outcome = solve_model(&model, &request.options, &request.pins)?;
    mft_project::save_final_json(request.output_path, &outcome.result)?;

    info!(
        model = model.kind(),
        iterations = outcome.iterations,
        free_energy = outcome.free_energy(),
        elapsed_s = start.elapsed().as_secs_f64(),
        "solve finished"
    );
    Ok(outcome)
}
