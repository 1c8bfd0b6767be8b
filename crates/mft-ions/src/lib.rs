//! Ionic sector: thermal averages over discrete spin configurations.
//!
//! Spins take values in {-1, 0, 1}. The partition function, first moments
//! `<S_i>` and second moments `<S_i^2>` are computed together from weights
//! shifted by the minimum configuration energy, which keeps them finite at
//! any beta and selects the degenerate ground states at zero temperature.

pub mod configs;
pub mod error;
pub mod partition;
pub mod single_site;

pub use configs::ConfigurationSet;
pub use error::{IonError, IonResult};
pub use partition::{PartitionEngine, PartitionSums};
pub use single_site::SingleSiteLevels;
