//! Bond expectation channels and the cache dependency key.

use crate::hamiltonian::KPoint;
use std::fmt::Debug;
use std::hash::Hash;

/// Which component of the complex expectation value a channel keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    Re,
    Im,
}

impl Part {
    pub fn of(self, z: nalgebra::Complex<f64>) -> f64 {
        match self {
            Part::Re => z.re,
            Part::Im => z.im,
        }
    }

    pub fn other(self) -> Part {
        match self {
            Part::Re => Part::Im,
            Part::Im => Part::Re,
        }
    }
}

/// Momentum-space recipe for one hopping expectation value.
///
/// The value is `scale * <weight(k) * part(ev_lr(k))>_BZ`, where
/// `ev_lr(k) = sum_a conj(psi_a[left]) psi_a[right] f(eps_a)`.
/// When `check_scale` is set, `check_scale * <weight(k) * other_part(ev_lr(k))>`
/// must vanish; a nonzero result means the band structure broke a symmetry
/// the model relies on.
#[derive(Clone, Copy)]
pub struct ChannelSpec {
    pub name: &'static str,
    pub left: usize,
    pub right: usize,
    pub weight: fn(&KPoint) -> f64,
    pub part: Part,
    pub scale: f64,
    pub check_scale: Option<f64>,
}

impl Debug for ChannelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelSpec")
            .field("name", &self.name)
            .field("left", &self.left)
            .field("right", &self.right)
            .field("part", &self.part)
            .field("scale", &self.scale)
            .field("check_scale", &self.check_scale)
            .finish()
    }
}

/// Closed set of channels a model exposes.
pub trait Channel: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    fn spec(&self) -> ChannelSpec;

    fn all() -> &'static [Self];

    fn name(&self) -> &'static str {
        self.spec().name
    }
}

/// Bit patterns of the variables a cached value was computed from.
///
/// Compared bitwise, so `0.0` and `-0.0` are different keys and a NaN
/// matches only an identical NaN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyKey(Vec<u64>);

impl DependencyKey {
    pub fn from_values(values: &[f64]) -> Self {
        Self(values.iter().map(|v| v.to_bits()).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Unit weight for channels with no momentum form factor.
pub(crate) fn unit_weight(_k: &KPoint) -> f64 {
    1.0
}
