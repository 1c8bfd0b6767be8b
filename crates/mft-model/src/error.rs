//! Error types for model setup.

use mft_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: String },

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type ModelResult<T> = Result<T, ModelError>;
