//! Cubic model: a single ionic site type on a lattice with ordering
//! vector `Q = (pi, pi, pi)`.

use crate::channel::{Channel, ChannelSpec, DependencyKey, Part, unit_weight};
use crate::error::{ModelError, ModelResult};
use crate::hamiltonian::{ElectronicModel, HMatrix, HermitianBuilder, KPoint, phase};
use crate::variable::{VarRole, Variable};
use crate::HOPPING_EPS;
use mft_core::{ensure_beta, ensure_finite};
use nalgebra::Complex;
use std::f64::consts::PI;
use std::str::FromStr;

const Q: KPoint = [PI, PI, PI];

/// Parameters and solved state of the cubic model.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicEnv {
    /// Points per dimension of the k mesh
    pub bz_points_per_dim: usize,
    /// Even-symmetry hoppings (a: in-plane, c: along z, b: body diagonal)
    pub tae: f64,
    pub tce: f64,
    pub tbe: f64,
    /// Odd-symmetry hoppings
    pub tao: f64,
    pub tco: f64,
    pub tbo: f64,
    /// Ionic order parameter `<S>`
    pub m: f64,
    /// Ionic second moment `<S^2>`
    pub w: f64,
    /// Electronic chemical potential
    pub mu: f64,
    /// Inverse temperature; `f64::INFINITY` is zero temperature
    pub beta: f64,
    /// Single-ion anisotropy
    pub b: f64,
    pub ja: f64,
    pub jc: f64,
    pub ka: f64,
    pub kc: f64,
    pub kb: f64,
    /// On-site energies of the metallic and rutile configurations
    pub epsilon_m: f64,
    pub epsilon_r: f64,
    /// Skip the electronic sector entirely
    pub ions_only: bool,
}

impl Default for CubicEnv {
    fn default() -> Self {
        Self {
            bz_points_per_dim: 8,
            tae: 0.0,
            tce: 0.0,
            tbe: 0.0,
            tao: 0.0,
            tco: 0.0,
            tbo: 0.0,
            m: 0.0,
            w: 0.0,
            mu: 0.0,
            beta: 1.0,
            b: 0.0,
            ja: 0.0,
            jc: 0.0,
            ka: 0.0,
            kc: 0.0,
            kb: 0.0,
            epsilon_m: 0.0,
            epsilon_r: 0.0,
            ions_only: false,
        }
    }
}

impl CubicEnv {
    pub fn delta_s(&self) -> f64 {
        self.b + self.epsilon_m - self.epsilon_r
    }

    /// Biquadratic coupling summed over neighbours.
    pub fn qk(&self) -> f64 {
        4.0 * self.ka + 2.0 * self.kc + 8.0 * self.kb
    }

    /// Exchange coupling summed over neighbours, ions only.
    pub fn qj_ion(&self) -> f64 {
        4.0 * self.ja + 2.0 * self.jc
    }

    /// Exchange coupling including the electron-mediated odd-hopping terms.
    pub fn qj(&self, dao: f64, dco: f64) -> f64 {
        4.0 * (self.ja + self.tao * dao) + 2.0 * (self.jc + self.tco * dco)
    }

    /// Even-hopping band energy per site.
    pub fn qele(&self, dae: f64, dce: f64, dbe: f64) -> f64 {
        4.0 * self.tae * dae + 2.0 * self.tce * dce + 8.0 * self.tbe * dbe
    }

    /// On-site energy shared by every band.
    pub fn onsite(&self) -> f64 {
        (1.0 - self.w) * self.epsilon_r + self.w * self.epsilon_m - self.mu
    }

    /// Copy with the electronic sector switched off.
    pub fn ions_only_env(&self) -> Self {
        Self {
            tae: 0.0,
            tce: 0.0,
            tbe: 0.0,
            tao: 0.0,
            tco: 0.0,
            tbo: 0.0,
            mu: 0.0,
            ions_only: true,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.bz_points_per_dim == 0 {
            return Err(ModelError::InvalidParameter {
                what: "BZPointsPerDim must be positive".to_string(),
            });
        }
        ensure_beta(self.beta)?;
        let fields = [
            (self.tae, "Tae"),
            (self.tce, "Tce"),
            (self.tbe, "Tbe"),
            (self.tao, "Tao"),
            (self.tco, "Tco"),
            (self.tbo, "Tbo"),
            (self.m, "M"),
            (self.w, "W"),
            (self.mu, "Mu"),
            (self.b, "B"),
            (self.ja, "Ja"),
            (self.jc, "Jc"),
            (self.ka, "Ka"),
            (self.kc, "Kc"),
            (self.kb, "Kb"),
            (self.epsilon_m, "EpsilonM"),
            (self.epsilon_r, "EpsilonR"),
        ];
        for (value, what) in fields {
            ensure_finite(value, what)?;
        }
        Ok(())
    }

    fn eps_ae(&self, k: &KPoint) -> f64 {
        -2.0 * (self.tae * (k[0].cos() + k[1].cos()) + self.tce * k[2].cos())
    }

    fn eps_be(&self, k: &KPoint) -> f64 {
        -8.0 * self.tbe * (k[0] / 2.0).cos() * (k[1] / 2.0).cos() * (k[2] / 2.0).cos()
    }

    fn eps_ao(&self, k: &KPoint) -> Complex<f64> {
        let sins = self.tao * (k[0].sin() + k[1].sin()) + self.tco * k[2].sin();
        Complex::new(0.0, -2.0 * self.m * sins)
    }

    fn eps_bo(&self, k: &KPoint) -> Complex<f64> {
        let ccc = (k[0] / 2.0).cos() * (k[1] / 2.0).cos() * (k[2] / 2.0).cos();
        let sss = (k[0] / 2.0).sin() * (k[1] / 2.0).sin() * (k[2] / 2.0).sin();
        let amp = 8.0 * self.m * self.tbo;
        Complex::new(-amp * ccc, amp * sss)
    }
}

impl ElectronicModel for CubicEnv {
    fn mesh_size(&self) -> usize {
        self.bz_points_per_dim
    }

    fn beta(&self) -> f64 {
        self.beta
    }

    fn hamiltonian(&self, k: &KPoint) -> HMatrix {
        let kq = [k[0] + Q[0], k[1] + Q[1], k[2] + Q[2]];
        let ikd = phase((k[0] + k[1] + k[2]) / 2.0);
        let i = Complex::new(0.0, 1.0);

        let onsite = self.onsite();
        let ae = self.eps_ae(k);
        let ao = self.eps_ao(k);
        let be = self.eps_be(k);
        let bo = self.eps_bo(k);
        let be_kq = self.eps_be(&kq);

        HermitianBuilder::new()
            .diagonal(0, ae + onsite)
            .diagonal(1, -ae + onsite)
            .diagonal(2, ae + onsite)
            .diagonal(3, -ae + onsite)
            .upper(0, 1, ao * -2.0)
            .upper(0, 2, ikd * be)
            .upper(0, 3, -bo * ikd)
            .upper(1, 2, bo * ikd)
            .upper(1, 3, -i * ikd * be_kq)
            .upper(2, 3, ao * -2.0)
            .build()
    }

    fn hoppings_finite(&self) -> bool {
        [self.tae, self.tce, self.tbe, self.tao, self.tco, self.tbo]
            .iter()
            .any(|t| t.abs() > HOPPING_EPS)
    }

    /// `w` enters only through the on-site term, which is constant when
    /// the two on-site energies coincide.
    fn dependency_key(&self) -> DependencyKey {
        if self.epsilon_m == self.epsilon_r {
            DependencyKey::from_values(&[self.m, self.mu])
        } else {
            DependencyKey::from_values(&[self.m, self.w, self.mu])
        }
    }
}

/// Solvable fields of [`CubicEnv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubicVar {
    M,
    W,
    Mu,
}

impl CubicVar {
    pub const ALL: [CubicVar; 3] = [CubicVar::M, CubicVar::W, CubicVar::Mu];
}

impl Variable<CubicEnv> for CubicVar {
    fn get(&self, env: &CubicEnv) -> f64 {
        match self {
            CubicVar::M => env.m,
            CubicVar::W => env.w,
            CubicVar::Mu => env.mu,
        }
    }

    fn set(&self, env: &mut CubicEnv, value: f64) {
        match self {
            CubicVar::M => env.m = value,
            CubicVar::W => env.w = value,
            CubicVar::Mu => env.mu = value,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            CubicVar::M => "M",
            CubicVar::W => "W",
            CubicVar::Mu => "Mu",
        }
    }

    fn role(&self) -> VarRole {
        match self {
            CubicVar::M | CubicVar::W => VarRole::OrderParameter,
            CubicVar::Mu => VarRole::ChemicalPotential,
        }
    }
}

impl FromStr for CubicVar {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CubicVar::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| ModelError::UnknownVariable {
                name: s.to_string(),
            })
    }
}

/// Bond expectation values of the cubic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubicChannel {
    Dae,
    Dce,
    Dbe,
    Dao,
    Dco,
    Dbo,
}

const CUBIC_CHANNELS: [CubicChannel; 6] = [
    CubicChannel::Dae,
    CubicChannel::Dce,
    CubicChannel::Dbe,
    CubicChannel::Dao,
    CubicChannel::Dco,
    CubicChannel::Dbo,
];

// Spin degeneracy folds a factor 0.5 into every scale below.
impl Channel for CubicChannel {
    fn spec(&self) -> ChannelSpec {
        match self {
            CubicChannel::Dae => ChannelSpec {
                name: "Dae",
                left: 0,
                right: 0,
                weight: |k| k[0].cos(),
                part: Part::Re,
                scale: 0.5 * 4.0,
                check_scale: Some(-4.0),
            },
            CubicChannel::Dce => ChannelSpec {
                name: "Dce",
                left: 0,
                right: 0,
                weight: |k| k[2].cos(),
                part: Part::Re,
                scale: 0.5 * 4.0,
                check_scale: Some(-4.0),
            },
            // 2 Re(ev + conj(ev)); the imaginary part cancels identically.
            CubicChannel::Dbe => ChannelSpec {
                name: "Dbe",
                left: 0,
                right: 2,
                weight: unit_weight,
                part: Part::Re,
                scale: 0.5 * 4.0,
                check_scale: None,
            },
            CubicChannel::Dao => ChannelSpec {
                name: "Dao",
                left: 1,
                right: 0,
                weight: |k| k[0].sin(),
                part: Part::Im,
                scale: 0.5 * -2.0,
                check_scale: Some(2.0),
            },
            CubicChannel::Dco => ChannelSpec {
                name: "Dco",
                left: 1,
                right: 0,
                weight: |k| k[2].sin(),
                part: Part::Im,
                scale: 0.5 * -2.0,
                check_scale: Some(2.0),
            },
            CubicChannel::Dbo => ChannelSpec {
                name: "Dbo",
                left: 1,
                right: 2,
                weight: unit_weight,
                part: Part::Re,
                scale: 0.5 * 2.0,
                check_scale: None,
            },
        }
    }

    fn all() -> &'static [Self] {
        &CUBIC_CHANNELS
    }
}
