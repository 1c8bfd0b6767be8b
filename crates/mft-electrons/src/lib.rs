//! Electronic sector of the mean-field engine.
//!
//! Brillouin-zone averages of band quantities for any
//! [`mft_model::ElectronicModel`]: hopping expectation values (with a
//! memoizing cache keyed on the solved variables), band filling and the
//! band contribution to the free energy.

pub mod bands;
pub mod bzone;
pub mod cache;
pub mod eigen;
pub mod error;
pub mod expectation;

pub use bands::{band_filling, band_free_energy};
pub use cache::ExpectationCache;
pub use eigen::{CountingEigensolver, Eigensystem, HermitianEigensolver, NalgebraEigensolver};
pub use error::{ElectronError, ElectronResult};
pub use expectation::{SYMMETRY_TOL, bond_expectation, evaluate_channel};
