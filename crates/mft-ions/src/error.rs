//! Error types for ionic averages.

use mft_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IonError {
    #[error("Non-finite configuration energy: {value}")]
    NonFiniteEnergy { value: f64 },

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type IonResult<T> = Result<T, IonError>;
