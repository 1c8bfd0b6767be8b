//! Dimerized model: four ionic site types on two sublattices, ordering
//! vector `Q = (0, pi, pi)`.
//!
//! Site `S_pa` sits on sublattice `p` as dimer partner `a`; its index in
//! spin arrays is `p + 2 (a - 1)`, giving the order `S01, S11, S02, S12`.

use crate::channel::{Channel, ChannelSpec, DependencyKey, Part};
use crate::error::{ModelError, ModelResult};
use crate::hamiltonian::{ElectronicModel, HMatrix, HermitianBuilder, KPoint};
use crate::variable::{VarRole, Variable};
use crate::HOPPING_EPS;
use mft_core::{ensure_beta, ensure_finite};
use nalgebra::Complex;
use std::f64::consts::PI;
use std::str::FromStr;

const Q: KPoint = [0.0, PI, PI];

/// Ionic site type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    S01,
    S11,
    S02,
    S12,
}

impl Site {
    pub const ALL: [Site; 4] = [Site::S01, Site::S11, Site::S02, Site::S12];

    pub fn index(self) -> usize {
        match self {
            Site::S01 => 0,
            Site::S11 => 1,
            Site::S02 => 2,
            Site::S12 => 3,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Site::S01 => "01",
            Site::S11 => "11",
            Site::S02 => "02",
            Site::S12 => "12",
        }
    }
}

/// Parameters and solved state of the dimerized model.
#[derive(Debug, Clone, PartialEq)]
pub struct DimerEnv {
    pub bz_points_per_dim: usize,
    pub m01: f64,
    pub m11: f64,
    pub m02: f64,
    pub m12: f64,
    pub w01: f64,
    pub w11: f64,
    pub w02: f64,
    pub w12: f64,
    pub mu: f64,
    pub beta: f64,
    /// Single-ion anisotropies
    pub bxy0: f64,
    pub bzz0: f64,
    pub bxz0: f64,
    /// Exchange along b and c
    pub jb0: f64,
    pub jc0: f64,
    /// Biquadratic couplings
    pub kb0: f64,
    pub kcxx0: f64,
    pub kczz0: f64,
    pub kcxz0: f64,
    pub tce: f64,
    pub tco: f64,
    pub tbe: f64,
    pub ions_only: bool,
}

impl Default for DimerEnv {
    fn default() -> Self {
        Self {
            bz_points_per_dim: 8,
            m01: 0.0,
            m11: 0.0,
            m02: 0.0,
            m12: 0.0,
            w01: 0.0,
            w11: 0.0,
            w02: 0.0,
            w12: 0.0,
            mu: 0.0,
            beta: 1.0,
            bxy0: 0.0,
            bzz0: 0.0,
            bxz0: 0.0,
            jb0: 0.0,
            jc0: 0.0,
            kb0: 0.0,
            kcxx0: 0.0,
            kczz0: 0.0,
            kcxz0: 0.0,
            tce: 0.0,
            tco: 0.0,
            tbe: 0.0,
            ions_only: false,
        }
    }
}

impl DimerEnv {
    pub fn moment(&self, site: Site) -> f64 {
        match site {
            Site::S01 => self.m01,
            Site::S11 => self.m11,
            Site::S02 => self.m02,
            Site::S12 => self.m12,
        }
    }

    pub fn second_moment(&self, site: Site) -> f64 {
        match site {
            Site::S01 => self.w01,
            Site::S11 => self.w11,
            Site::S02 => self.w02,
            Site::S12 => self.w12,
        }
    }

    /// Mean-field energy of one ionic configuration `s = [S01, S11, S02, S12]`.
    ///
    /// `dco` is the odd c-axis hopping expectation value; it couples to the
    /// dimerizing sites S01 and S12 through `2 tco dco`.
    pub fn site_energy(&self, s: &[f64; 4], dco: f64) -> f64 {
        let [s01, s11, s02, s12] = *s;
        let el = 2.0 * self.tco * dco;

        let e01 = (self.bzz0 + 4.0 * self.kb0 * self.w11 + 2.0 * self.kczz0 * self.w01
            + self.kcxz0 * self.w02)
            * s01
            * s01
            - (4.0 * self.jb0 * self.m11 + 2.0 * self.jc0 * self.m01 + el) * s01;
        let e11 = (self.bxy0 + 4.0 * self.kb0 * self.w01 + 2.0 * self.kcxx0 * self.w11
            + self.kcxz0 * self.w12)
            * s11
            * s11
            - 4.0 * self.jb0 * self.m01 * s11;
        let e02 = (self.bxy0 + 4.0 * self.kb0 * self.w12 + 2.0 * self.kcxx0 * self.w02
            + self.kcxz0 * self.w01)
            * s02
            * s02
            - 4.0 * self.jb0 * self.m12 * s02;
        let e12 = (self.bzz0 + 4.0 * self.kb0 * self.w02 + 2.0 * self.kczz0 * self.w12
            + self.kcxz0 * self.w11)
            * s12
            * s12
            - (4.0 * self.jb0 * self.m02 + 2.0 * self.jc0 * self.m12 + el) * s12;
        let cross = self.bxz0 * (s02 * s02 * s01 * s01 + s11 * s11 * s12 * s12);

        e01 + e11 + e02 + e12 + cross
    }

    /// Double-counting correction of the ionic mean-field decoupling.
    pub fn ion_constant(&self) -> f64 {
        self.jc0 * (self.m01 * self.m01 + self.m12 * self.m12)
            - self.kcxx0 * (self.w02 * self.w02 + self.w11 * self.w11)
            - self.kczz0 * (self.w01 * self.w01 + self.w12 * self.w12)
            - self.kcxz0 * (self.w01 * self.w02 + self.w11 * self.w12)
            + 4.0 * self.jb0 * (self.m01 * self.m11 + self.m02 * self.m12)
            - 4.0 * self.kb0 * (self.w01 * self.w11 + self.w02 * self.w12)
    }

    /// Double-counting correction of the ion-electron decoupling.
    pub fn ion_electron_constant(&self, dco: f64) -> f64 {
        2.0 * self.tco * (self.m01 + self.m12) * dco
    }

    /// Copy with hoppings and chemical potential zeroed, ions only.
    pub fn ions_only_env(&self) -> Self {
        Self {
            tce: 0.0,
            tco: 0.0,
            tbe: 0.0,
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
            (self.m01, "M01"),
            (self.m11, "M11"),
            (self.m02, "M02"),
            (self.m12, "M12"),
            (self.w01, "W01"),
            (self.w11, "W11"),
            (self.w02, "W02"),
            (self.w12, "W12"),
            (self.mu, "Mu"),
            (self.bxy0, "Bxy0"),
            (self.bzz0, "Bzz0"),
            (self.bxz0, "Bxz0"),
            (self.jb0, "Jb0"),
            (self.jc0, "Jc0"),
            (self.kb0, "Kb0"),
            (self.kcxx0, "Kcxx0"),
            (self.kczz0, "Kczz0"),
            (self.kcxz0, "Kcxz0"),
            (self.tce, "Tce"),
            (self.tco, "Tco"),
            (self.tbe, "Tbe"),
        ];
        for (value, what) in fields {
            ensure_finite(value, what)?;
        }
        Ok(())
    }

    fn eps_ae(&self, k: &KPoint) -> f64 {
        -self.tce * k[2].cos()
    }

    fn eps_be(&self, k: &KPoint) -> Complex<f64> {
        let sum = Complex::new(1.0, 0.0)
            + Complex::new(k[0].cos(), -k[0].sin())
            + Complex::new(k[1].cos(), -k[1].sin())
            + Complex::new(k[2].cos(), -k[2].sin());
        sum * -self.tbe
    }

    fn eps_ao(&self, k: &KPoint) -> Complex<f64> {
        Complex::new(0.0, -2.0 * self.tco * k[2].sin())
    }
}

impl ElectronicModel for DimerEnv {
    fn mesh_size(&self) -> usize {
        self.bz_points_per_dim
    }

    fn beta(&self) -> f64 {
        self.beta
    }

    fn hamiltonian(&self, k: &KPoint) -> HMatrix {
        let kq = [k[0] + Q[0], k[1] + Q[1], k[2] + Q[2]];
        let shift = -0.5 * self.mu;
        let ae = self.eps_ae(k);
        let ao = self.eps_ao(k);

        HermitianBuilder::new()
            .diagonal(0, ae + shift)
            .diagonal(1, -ae + shift)
            .diagonal(2, ae + shift)
            .diagonal(3, -ae + shift)
            .upper(0, 1, ao * self.m01)
            .upper(0, 2, self.eps_be(k))
            .upper(1, 3, self.eps_be(&kq))
            .upper(2, 3, ao * self.m12)
            .build()
    }

    fn hoppings_finite(&self) -> bool {
        [self.tce, self.tco, self.tbe]
            .iter()
            .any(|t| t.abs() > HOPPING_EPS)
    }

    fn dependency_key(&self) -> DependencyKey {
        DependencyKey::from_values(&[self.m01, self.m12, self.mu])
    }
}

/// Solvable fields of [`DimerEnv`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimerVar {
    M(Site),
    W(Site),
    Mu,
}

impl DimerVar {
    pub fn all() -> Vec<DimerVar> {
        let mut vars: Vec<DimerVar> = Site::ALL.into_iter().map(DimerVar::M).collect();
        vars.extend(Site::ALL.into_iter().map(DimerVar::W));
        vars.push(DimerVar::Mu);
        vars
    }
}

impl Variable<DimerEnv> for DimerVar {
    fn get(&self, env: &DimerEnv) -> f64 {
        match *self {
            DimerVar::M(site) => env.moment(site),
            DimerVar::W(site) => env.second_moment(site),
            DimerVar::Mu => env.mu,
        }
    }

    fn set(&self, env: &mut DimerEnv, value: f64) {
        let field = match *self {
            DimerVar::M(Site::S01) => &mut env.m01,
            DimerVar::M(Site::S11) => &mut env.m11,
            DimerVar::M(Site::S02) => &mut env.m02,
            DimerVar::M(Site::S12) => &mut env.m12,
            DimerVar::W(Site::S01) => &mut env.w01,
            DimerVar::W(Site::S11) => &mut env.w11,
            DimerVar::W(Site::S02) => &mut env.w02,
            DimerVar::W(Site::S12) => &mut env.w12,
            DimerVar::Mu => &mut env.mu,
        };
        *field = value;
    }

    fn name(&self) -> &'static str {
        match *self {
            DimerVar::M(Site::S01) => "M01",
            DimerVar::M(Site::S11) => "M11",
            DimerVar::M(Site::S02) => "M02",
            DimerVar::M(Site::S12) => "M12",
            DimerVar::W(Site::S01) => "W01",
            DimerVar::W(Site::S11) => "W11",
            DimerVar::W(Site::S02) => "W02",
            DimerVar::W(Site::S12) => "W12",
            DimerVar::Mu => "Mu",
        }
    }

    fn role(&self) -> VarRole {
        match self {
            DimerVar::M(_) | DimerVar::W(_) => VarRole::OrderParameter,
            DimerVar::Mu => VarRole::ChemicalPotential,
        }
    }
}

impl FromStr for DimerVar {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "Mu" {
            return Ok(DimerVar::Mu);
        }
        let unknown = || ModelError::UnknownVariable {
            name: s.to_string(),
        };
        let (head, tail) = s.split_at_checked(1).ok_or_else(unknown)?;
        let site = Site::ALL
            .into_iter()
            .find(|site| site.suffix() == tail)
            .ok_or_else(unknown)?;
        match head {
            "M" => Ok(DimerVar::M(site)),
            "W" => Ok(DimerVar::W(site)),
            _ => Err(unknown()),
        }
    }
}

/// Bond expectation values of the dimerized model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DimerChannel {
    Dco,
}

impl Channel for DimerChannel {
    fn spec(&self) -> ChannelSpec {
        match self {
            DimerChannel::Dco => ChannelSpec {
                name: "Dco",
                left: 0,
                right: 1,
                weight: |k| k[2].sin(),
                part: Part::Im,
                scale: 2.0,
                check_scale: Some(-2.0),
            },
        }
    }

    fn all() -> &'static [Self] {
        &[DimerChannel::Dco]
    }
}
