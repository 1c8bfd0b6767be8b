use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Inverse temperature must be positive or +inf, got {value}")]
    InvalidBeta { value: f64 },

    #[error("Invalid {what} tolerance: {value}")]
    InvalidTolerance { what: &'static str, value: f64 },
}
