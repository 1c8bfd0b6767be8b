//! Error types for mean-field solving.

use mft_core::CoreError;
use mft_electrons::ElectronError;
use mft_ions::IonError;
use mft_model::ModelError;
use thiserror::Error;

/// Errors that can occur while solving the self-consistency equations.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Numeric error: {what}")]
    Numeric { what: String },

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Electronic error: {0}")]
    Electron(#[from] ElectronError),

    #[error("Ionic error: {0}")]
    Ion(#[from] IonError),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type SolverResult<T> = Result<T, SolverError>;
