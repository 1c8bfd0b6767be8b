//! Error types for electronic averages.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ElectronError {
    /// The part of an expectation value that must cancel by symmetry did not.
    #[error("Symmetry violation in {channel}: discarded part averages to {residual:e}")]
    SymmetryViolation { channel: &'static str, residual: f64 },

    #[error("Non-finite expectation value for {channel}: {value}")]
    NonFinite { channel: &'static str, value: f64 },
}

pub type ElectronResult<T> = Result<T, ElectronError>;
