//! Parameter file schema.
//!
//! Field names follow the established PascalCase keys (`Tae`, `EpsilonM`,
//! `BZPointsPerDim`, ...). The model family is selected by the `Model` tag.

use mft_model::{CubicEnv, DimerEnv};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "Model")]
pub enum ModelDef {
    Cubic(CubicDef),
    Dimer(DimerDef),
}

impl ModelDef {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelDef::Cubic(_) => "Cubic",
            ModelDef::Dimer(_) => "Dimer",
        }
    }

    pub fn set_ions_only(&mut self, ions_only: bool) {
        match self {
            ModelDef::Cubic(def) => def.ions_only = ions_only,
            ModelDef::Dimer(def) => def.ions_only = ions_only,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CubicDef {
    #[serde(rename = "BZPointsPerDim")]
    pub bz_points_per_dim: usize,
    pub tae: f64,
    pub tce: f64,
    pub tbe: f64,
    pub tao: f64,
    pub tco: f64,
    pub tbo: f64,
    #[serde(default)]
    pub m: f64,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub mu: f64,
    #[serde(with = "beta_sentinel")]
    pub beta: f64,
    pub b: f64,
    pub ja: f64,
    pub jc: f64,
    pub ka: f64,
    pub kc: f64,
    pub kb: f64,
    pub epsilon_m: f64,
    pub epsilon_r: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ions_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DimerDef {
    #[serde(rename = "BZPointsPerDim")]
    pub bz_points_per_dim: usize,
    #[serde(default)]
    pub m01: f64,
    #[serde(default)]
    pub m11: f64,
    #[serde(default)]
    pub m02: f64,
    #[serde(default)]
    pub m12: f64,
    #[serde(default)]
    pub w01: f64,
    #[serde(default)]
    pub w11: f64,
    #[serde(default)]
    pub w02: f64,
    #[serde(default)]
    pub w12: f64,
    #[serde(default)]
    pub mu: f64,
    #[serde(with = "beta_sentinel")]
    pub beta: f64,
    pub bxy0: f64,
    pub bzz0: f64,
    pub bxz0: f64,
    pub jb0: f64,
    pub jc0: f64,
    pub kb0: f64,
    pub kcxx0: f64,
    pub kczz0: f64,
    pub kcxz0: f64,
    pub tce: f64,
    pub tco: f64,
    pub tbe: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub ions_only: bool,
}

/// Zero temperature is stored as `f64::MAX`, since JSON has no infinity.
pub mod beta_sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn to_file(beta: f64) -> f64 {
        if beta == f64::INFINITY { f64::MAX } else { beta }
    }

    pub fn from_file(value: f64) -> f64 {
        if value == f64::MAX { f64::INFINITY } else { value }
    }

    pub fn serialize<S: Serializer>(beta: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_file(*beta))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(from_file(f64::deserialize(deserializer)?))
    }
}

impl From<&CubicDef> for CubicEnv {
    fn from(def: &CubicDef) -> Self {
        CubicEnv {
            bz_points_per_dim: def.bz_points_per_dim,
            tae: def.tae,
            tce: def.tce,
            tbe: def.tbe,
            tao: def.tao,
            tco: def.tco,
            tbo: def.tbo,
            m: def.m,
            w: def.w,
            mu: def.mu,
            beta: def.beta,
            b: def.b,
            ja: def.ja,
            jc: def.jc,
            ka: def.ka,
            kc: def.kc,
            kb: def.kb,
            epsilon_m: def.epsilon_m,
            epsilon_r: def.epsilon_r,
            ions_only: def.ions_only,
        }
    }
}

impl From<&CubicEnv> for CubicDef {
    fn from(env: &CubicEnv) -> Self {
        CubicDef {
            bz_points_per_dim: env.bz_points_per_dim,
            tae: env.tae,
            tce: env.tce,
            tbe: env.tbe,
            tao: env.tao,
            tco: env.tco,
            tbo: env.tbo,
            m: env.m,
            w: env.w,
            mu: env.mu,
            beta: env.beta,
            b: env.b,
            ja: env.ja,
            jc: env.jc,
            ka: env.ka,
            kc: env.kc,
            kb: env.kb,
            epsilon_m: env.epsilon_m,
            epsilon_r: env.epsilon_r,
            ions_only: env.ions_only,
        }
    }
}

impl From<&DimerDef> for DimerEnv {
    fn from(def: &DimerDef) -> Self {
        DimerEnv {
            bz_points_per_dim: def.bz_points_per_dim,
            m01: def.m01,
            m11: def.m11,
            m02: def.m02,
            m12: def.m12,
            w01: def.w01,
            w11: def.w11,
            w02: def.w02,
            w12: def.w12,
            mu: def.mu,
            beta: def.beta,
            bxy0: def.bxy0,
            bzz0: def.bzz0,
            bxz0: def.bxz0,
            jb0: def.jb0,
            jc0: def.jc0,
            kb0: def.kb0,
            kcxx0: def.kcxx0,
            kczz0: def.kczz0,
            kcxz0: def.kcxz0,
            tce: def.tce,
            tco: def.tco,
            tbe: def.tbe,
            ions_only: def.ions_only,
        }
    }
}

impl From<&DimerEnv> for DimerDef {
    fn from(env: &DimerEnv) -> Self {
        DimerDef {
            bz_points_per_dim: env.bz_points_per_dim,
            m01: env.m01,
            m11: env.m11,
            m02: env.m02,
            m12: env.m12,
            w01: env.w01,
            w11: env.w11,
            w02: env.w02,
            w12: env.w12,
            mu: env.mu,
            beta: env.beta,
            bxy0: env.bxy0,
            bzz0: env.bzz0,
            bxz0: env.bxz0,
            jb0: env.jb0,
            jc0: env.jc0,
            kb0: env.kb0,
            kcxx0: env.kcxx0,
            kczz0: env.kczz0,
            kcxz0: env.kcxz0,
            tce: env.tce,
            tco: env.tco,
            tbe: env.tbe,
            ions_only: env.ions_only,
        }
    }
}

/// A solved model with its derived quantities, written as one flat object:
/// the model fields, one key per expectation value, and `FreeEnergy`.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalDef {
    pub model: ModelDef,
    pub expectations: Vec<(String, f64)>,
    pub free_energy: f64,
}

impl FinalDef {
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        let mut value = serde_json::to_value(&self.model)?;
        if let serde_json::Value::Object(map) = &mut value {
            for (name, v) in &self.expectations {
                map.insert(name.clone(), serde_json::Value::from(*v));
            }
            map.insert(
                "FreeEnergy".to_string(),
                serde_json::Value::from(self.free_energy),
            );
        }
        Ok(value)
    }
}
