//! Parameter file validation.

use crate::schema::{CubicDef, DimerDef, ModelDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub fn validate_model(model: &ModelDef) -> Result<(), ValidationError> {
    match model {
        ModelDef::Cubic(def) => validate_cubic(def),
        ModelDef::Dimer(def) => validate_dimer(def),
    }
}

fn validate_common(mesh: usize, beta: f64) -> Result<(), ValidationError> {
    if mesh == 0 {
        return Err(ValidationError::InvalidValue {
            field: "BZPointsPerDim".to_string(),
            value: mesh.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if beta.is_nan() || beta <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "Beta".to_string(),
            value: beta.to_string(),
            reason: "must be positive".to_string(),
        });
    }
    Ok(())
}

fn check_finite(fields: &[(&str, f64)]) -> Result<(), ValidationError> {
    for &(field, value) in fields {
        if !value.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: field.to_string(),
                value: value.to_string(),
                reason: "must be finite".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_cubic(def: &CubicDef) -> Result<(), ValidationError> {
    validate_common(def.bz_points_per_dim, def.beta)?;
    check_finite(&[
        ("Tae", def.tae),
        ("Tce", def.tce),
        ("Tbe", def.tbe),
        ("Tao", def.tao),
        ("Tco", def.tco),
        ("Tbo", def.tbo),
        ("M", def.m),
        ("W", def.w),
        ("Mu", def.mu),
        ("B", def.b),
        ("Ja", def.ja),
        ("Jc", def.jc),
        ("Ka", def.ka),
        ("Kc", def.kc),
        ("Kb", def.kb),
        ("EpsilonM", def.epsilon_m),
        ("EpsilonR", def.epsilon_r),
    ])
}

fn validate_dimer(def: &DimerDef) -> Result<(), ValidationError> {
    validate_common(def.bz_points_per_dim, def.beta)?;
    check_finite(&[
        ("M01", def.m01),
        ("M11", def.m11),
        ("M02", def.m02),
        ("M12", def.m12),
        ("W01", def.w01),
        ("W11", def.w11),
        ("W02", def.w02),
        ("W12", def.w12),
        ("Mu", def.mu),
        ("Bxy0", def.bxy0),
        ("Bzz0", def.bzz0),
        ("Bxz0", def.bxz0),
        ("Jb0", def.jb0),
        ("Jc0", def.jc0),
        ("Kb0", def.kb0),
        ("Kcxx0", def.kcxx0),
        ("Kczz0", def.kczz0),
        ("Kcxz0", def.kcxz0),
        ("Tce", def.tce),
        ("Tco", def.tco),
        ("Tbe", def.tbe),
    ])
}
