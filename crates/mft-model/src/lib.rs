//! mft-model: model parameters and k-space Hamiltonians.
//!
//! Two lattice models share the engine:
//! - `cubic`: one ionic site type, ordering vector (pi, pi, pi)
//! - `dimer`: four dimerized site types, ordering vector (0, pi, pi)
//!
//! Each model exposes its 4x4 Bloch Hamiltonian through [`ElectronicModel`],
//! its solvable fields through [`Variable`] and its bond expectation values
//! through [`Channel`].

pub mod channel;
pub mod cubic;
pub mod dimer;
pub mod error;
pub mod hamiltonian;
pub mod variable;

pub use channel::{Channel, ChannelSpec, DependencyKey, Part};
pub use cubic::{CubicChannel, CubicEnv, CubicVar};
pub use dimer::{DimerChannel, DimerEnv, DimerVar, Site};
pub use error::{ModelError, ModelResult};
pub use hamiltonian::{ElectronicModel, HMatrix, HermitianBuilder, KPoint, is_hermitian};
pub use variable::{Binding, VarRole, Variable};

/// Hopping magnitude below which the electronic sector is treated as absent.
pub const HOPPING_EPS: f64 = 1e-9;
