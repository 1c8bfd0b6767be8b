//! Error types for the mft-app service layer.

/// Application error type wrapping the backend crates' errors for the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("No initial condition converged: {0}")]
    NoConvergence(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mft-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<mft_project::ProjectError> for AppError {
    fn from(err: mft_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<mft_model::ModelError> for AppError {
    fn from(err: mft_model::ModelError) -> Self {
        AppError::Model(err.to_string())
    }
}

impl From<mft_solver::SolverError> for AppError {
    fn from(err: mft_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}
