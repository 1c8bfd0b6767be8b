//! mft-project: parameter file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{ValidationError, validate_model};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported file format: {what}")]
    Format { what: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_json_str(content: &str) -> ProjectResult<ModelDef> {
    let model: ModelDef = serde_json::from_str(content)?;
    validate_model(&model)?;
    Ok(model)
}

pub fn to_json_string(model: &ModelDef) -> ProjectResult<String> {
    validate_model(model)?;
    Ok(serde_json::to_string_pretty(model)?)
}

pub fn load_yaml(path: &Path) -> ProjectResult<ModelDef> {
    let content = std::fs::read_to_string(path)?;
    let model: ModelDef = serde_yaml::from_str(&content)?;
    validate_model(&model)?;
    Ok(model)
}

pub fn save_yaml(path: &Path, model: &ModelDef) -> ProjectResult<()> {
    validate_model(model)?;
    let content = serde_yaml::to_string(model)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<ModelDef> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn save_json(path: &Path, model: &ModelDef) -> ProjectResult<()> {
    let content = to_json_string(model)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.yaml`/`.yml` as YAML, anything else as JSON.
pub fn load_path(path: &Path) -> ProjectResult<ModelDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") | None => load_json(path),
        Some(other) => Err(ProjectError::Format {
            what: format!("unrecognized extension '.{other}'"),
        }),
    }
}

pub fn save_final_json(path: &Path, result: &FinalDef) -> ProjectResult<()> {
    validate_model(&result.model)?;
    let content = serde_json::to_string_pretty(&result.to_value()?)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn save_final_json_list(path: &Path, results: &[FinalDef]) -> ProjectResult<()> {
    let values = results
        .iter()
        .map(|r| r.to_value())
        .collect::<Result<Vec<_>, _>>()?;
    let content = serde_json::to_string_pretty(&serde_json::Value::Array(values))?;
    std::fs::write(path, content)?;
    Ok(())
}
