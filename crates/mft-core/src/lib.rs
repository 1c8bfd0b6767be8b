//! mft-core: numeric foundation for the vo2 mean-field engine.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - occupation (overflow-safe Fermi function and band free-energy kernel)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod occupation;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use occupation::{fermi, fermi_sum, minus_t_log_one_plus_exp};
