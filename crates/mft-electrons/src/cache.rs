//! Memoized hopping expectation values.
//!
//! One cache belongs to one solve session. Entries are keyed on the model's
//! [`DependencyKey`]; parameters outside the key (beta, couplings) are
//! assumed frozen for the cache's lifetime.

use crate::eigen::HermitianEigensolver;
use crate::error::ElectronResult;
use crate::expectation::evaluate_channel;
use mft_model::{Channel, DependencyKey, ElectronicModel};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    key: DependencyKey,
    value: f64,
}

#[derive(Debug, Clone)]
pub struct ExpectationCache<C: Channel> {
    entries: HashMap<C, Entry>,
    recomputations: usize,
}

impl<C: Channel> Default for ExpectationCache<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Channel> ExpectationCache<C> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            recomputations: 0,
        }
    }

    /// Current value of `channel` for `model`.
    ///
    /// Returns the stored value when the dependency snapshot is bitwise
    /// unchanged. A model without hoppings yields exactly `0.0` without
    /// diagonalizing anything.
    pub fn value<M, E>(&mut self, channel: C, model: &M, solver: &E) -> ElectronResult<f64>
    where
        M: ElectronicModel,
        E: HermitianEigensolver,
    {
        let key = model.dependency_key();
        if let Some(entry) = self.entries.get(&channel)
            && entry.key == key
        {
            return Ok(entry.value);
        }
        if !model.hoppings_finite() {
            return Ok(0.0);
        }

        let value = evaluate_channel(model, &channel.spec(), solver)?;
        self.recomputations += 1;
        debug!(channel = channel.name(), value, "expectation value recomputed");
        self.entries.insert(channel, Entry { key, value });
        Ok(value)
    }

    /// Number of mesh evaluations performed so far.
    pub fn recomputations(&self) -> usize {
        self.recomputations
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eigen::CountingEigensolver;
    use mft_model::{CubicChannel, CubicEnv, DimerChannel, DimerEnv};

    fn cubic_env() -> CubicEnv {
        CubicEnv {
            bz_points_per_dim: 4,
            tae: 0.2,
            tce: 1.0,
            tbe: 0.4,
            tao: 0.08,
            tco: 0.4,
            tbo: 0.16,
            m: 0.3,
            w: 0.4,
            beta: 10.0,
            epsilon_m: 0.05,
            epsilon_r: 0.05,
            ..CubicEnv::default()
        }
    }

    #[test]
    fn zero_hoppings_short_circuit() {
        let solver = <CountingEigensolver>::default();
        let mut cache = ExpectationCache::new();
        let env = CubicEnv {
            m: 0.9,
            ..CubicEnv::default()
        };
        for &channel in CubicChannel::all() {
            assert_eq!(cache.value(channel, &env, &solver).unwrap(), 0.0);
        }
        let dimer = DimerEnv::default();
        let mut dimer_cache = ExpectationCache::new();
        assert_eq!(
            dimer_cache.value(DimerChannel::Dco, &dimer, &solver).unwrap(),
            0.0
        );
        assert_eq!(solver.calls(), 0);
        assert_eq!(cache.recomputations(), 0);
    }

    #[test]
    fn unchanged_state_hits() {
        let solver = <CountingEigensolver>::default();
        let mut cache = ExpectationCache::new();
        let env = cubic_env();
        let first = cache.value(CubicChannel::Dao, &env, &solver).unwrap();
        let calls = solver.calls();
        let second = cache.value(CubicChannel::Dao, &env, &solver).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(solver.calls(), calls);
        assert_eq!(cache.recomputations(), 1);
    }

    #[test]
    fn each_dependency_invalidates() {
        let solver = <CountingEigensolver>::default();
        let mut cache = ExpectationCache::new();
        let mut env = cubic_env();
        cache.value(CubicChannel::Dbe, &env, &solver).unwrap();

        env.m += 1e-3;
        cache.value(CubicChannel::Dbe, &env, &solver).unwrap();
        assert_eq!(cache.recomputations(), 2);

        env.mu += 1e-3;
        cache.value(CubicChannel::Dbe, &env, &solver).unwrap();
        assert_eq!(cache.recomputations(), 3);

        // on-site energies coincide, so w is not a dependency
        env.w += 1e-3;
        cache.value(CubicChannel::Dbe, &env, &solver).unwrap();
        assert_eq!(cache.recomputations(), 3);

        env.epsilon_r = 0.0;
        env.w += 1e-3;
        cache.value(CubicChannel::Dbe, &env, &solver).unwrap();
        assert_eq!(cache.recomputations(), 4);
    }

    #[test]
    fn channels_are_cached_independently() {
        let solver = <CountingEigensolver>::default();
        let mut cache = ExpectationCache::new();
        let env = cubic_env();
        cache.value(CubicChannel::Dae, &env, &solver).unwrap();
        cache.value(CubicChannel::Dce, &env, &solver).unwrap();
        cache.value(CubicChannel::Dae, &env, &solver).unwrap();
        assert_eq!(cache.recomputations(), 2);
        assert_eq!(solver.calls(), 2 * 4 * 4 * 4);
    }

    #[test]
    fn dimer_key_ignores_unrelated_moments() {
        let solver = <CountingEigensolver>::default();
        let mut cache = ExpectationCache::new();
        let mut env = DimerEnv {
            bz_points_per_dim: 4,
            m01: 0.5,
            m12: 0.5,
            tce: 0.5,
            tco: 0.3,
            tbe: 0.2,
            beta: 10.0,
            ..DimerEnv::default()
        };
        cache.value(DimerChannel::Dco, &env, &solver).unwrap();
        env.m11 = 0.7;
        env.w02 = 0.2;
        cache.value(DimerChannel::Dco, &env, &solver).unwrap();
        assert_eq!(cache.recomputations(), 1);
        env.m12 = 0.4;
        cache.value(DimerChannel::Dco, &env, &solver).unwrap();
        assert_eq!(cache.recomputations(), 2);
    }

    #[test]
    fn clear_forces_recompute() {
        let solver = <CountingEigensolver>::default();
        let mut cache = ExpectationCache::new();
        let env = cubic_env();
        cache.value(CubicChannel::Dco, &env, &solver).unwrap();
        cache.clear();
        cache.value(CubicChannel::Dco, &env, &solver).unwrap();
        assert_eq!(cache.recomputations(), 2);
    }
}
