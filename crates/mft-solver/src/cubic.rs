//! Self-consistency equations of the cubic model.

use crate::error::SolverResult;
use crate::report::FinalReport;
use crate::system::MeanFieldSystem;
use mft_electrons::{
    ExpectationCache, HermitianEigensolver, NalgebraEigensolver, band_filling, band_free_energy,
};
use mft_ions::SingleSiteLevels;
use mft_model::{Channel, CubicChannel, CubicEnv, CubicVar};
use nalgebra::DVector;

/// Cubic model state plus the caches of one solve session.
pub struct CubicSystem<'a, E = NalgebraEigensolver> {
    env: &'a mut CubicEnv,
    cache: ExpectationCache<CubicChannel>,
    eigensolver: E,
}

impl<'a> CubicSystem<'a> {
    pub fn new(env: &'a mut CubicEnv) -> Self {
        Self::with_eigensolver(env, NalgebraEigensolver)
    }
}

impl<'a, E: HermitianEigensolver> CubicSystem<'a, E> {
    pub fn with_eigensolver(env: &'a mut CubicEnv, eigensolver: E) -> Self {
        Self {
            env,
            cache: ExpectationCache::new(),
            eigensolver,
        }
    }

    pub fn cache(&self) -> &ExpectationCache<CubicChannel> {
        &self.cache
    }

    pub fn eigensolver(&self) -> &E {
        &self.eigensolver
    }

    /// Hopping expectation value at the current state; zero for ions only.
    pub fn expectation(&mut self, channel: CubicChannel) -> SolverResult<f64> {
        if self.env.ions_only {
            return Ok(0.0);
        }
        Ok(self.cache.value(channel, &*self.env, &self.eigensolver)?)
    }

    /// Single-site levels with the electron-renormalized exchange field.
    pub fn levels(&mut self) -> SolverResult<SingleSiteLevels> {
        let dao = self.expectation(CubicChannel::Dao)?;
        let dco = self.expectation(CubicChannel::Dco)?;
        let env = &*self.env;
        Ok(SingleSiteLevels {
            gap: env.delta_s() - env.w * env.qk(),
            field: env.m * env.qj(dao, dco),
        })
    }
}

impl<E: HermitianEigensolver> MeanFieldSystem for CubicSystem<'_, E> {
    type State = CubicEnv;
    type Var = CubicVar;

    fn state(&self) -> &CubicEnv {
        &*self.env
    }

    fn state_mut(&mut self) -> &mut CubicEnv {
        &mut *self.env
    }

    fn unknowns(&self) -> Vec<CubicVar> {
        CubicVar::ALL.to_vec()
    }

    fn ions_only(&self) -> bool {
        self.env.ions_only
    }

    fn residuals(&mut self, eqs: &[CubicVar]) -> SolverResult<DVector<f64>> {
        let needs_ions = eqs.iter().any(|v| matches!(v, CubicVar::M | CubicVar::W));
        let (m_new, w_new) = if needs_ions {
            let sums = self.levels()?.sums(self.env.beta)?;
            (sums.first[0], sums.second[0])
        } else {
            (0.0, 0.0)
        };

        let mut out = DVector::zeros(eqs.len());
        for (i, eq) in eqs.iter().enumerate() {
            out[i] = match eq {
                CubicVar::M => self.env.m - m_new,
                CubicVar::W => self.env.w - w_new,
                // 1 = 0.5 * <2 sum_a f(eps_a)>
                CubicVar::Mu => 1.0 - band_filling(&*self.env, &self.eigensolver),
            };
        }
        Ok(out)
    }

    fn final_report(&mut self) -> SolverResult<FinalReport> {
        let mut expectations = Vec::with_capacity(CubicChannel::all().len());
        for &channel in CubicChannel::all() {
            expectations.push((channel.name(), self.expectation(channel)?));
        }
        let dao = self.expectation(CubicChannel::Dao)?;
        let dco = self.expectation(CubicChannel::Dco)?;
        let levels = self.levels()?;

        let env = &*self.env;
        let f_ion = levels.free_energy(env.beta)?;
        let f_el = if env.ions_only {
            0.0
        } else {
            // spin factor 2 and the 0.5 per-site normalization cancel
            band_free_energy(env, &self.eigensolver)
        };
        let free_energy = f_ion
            + f_el
            + 0.5 * env.qj(dao, dco) * env.m * env.m
            + 0.5 * env.qk() * env.w * env.w;

        Ok(FinalReport {
            expectations,
            free_energy,
        })
    }
}
