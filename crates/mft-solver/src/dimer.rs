//! Self-consistency equations of the dimerized model.

use crate::error::SolverResult;
use crate::report::FinalReport;
use crate::system::MeanFieldSystem;
use mft_electrons::{
    ExpectationCache, HermitianEigensolver, NalgebraEigensolver, band_filling, band_free_energy,
};
use mft_ions::{PartitionEngine, PartitionSums};
use mft_model::{Channel, DimerChannel, DimerEnv, DimerVar};
use nalgebra::DVector;

/// Dimer model state plus the caches of one solve session.
pub struct DimerSystem<'a, E = NalgebraEigensolver> {
    env: &'a mut DimerEnv,
    cache: ExpectationCache<DimerChannel>,
    eigensolver: E,
    engine: PartitionEngine<4>,
}

impl<'a> DimerSystem<'a> {
    pub fn new(env: &'a mut DimerEnv) -> Self {
        Self::with_eigensolver(env, NalgebraEigensolver)
    }
}

impl<'a, E: HermitianEigensolver> DimerSystem<'a, E> {
    pub fn with_eigensolver(env: &'a mut DimerEnv, eigensolver: E) -> Self {
        Self {
            env,
            cache: ExpectationCache::new(),
            eigensolver,
            engine: PartitionEngine::new(),
        }
    }

    pub fn cache(&self) -> &ExpectationCache<DimerChannel> {
        &self.cache
    }

    pub fn dco(&mut self) -> SolverResult<f64> {
        if self.env.ions_only {
            return Ok(0.0);
        }
        Ok(self
            .cache
            .value(DimerChannel::Dco, &*self.env, &self.eigensolver)?)
    }

    /// Thermal sums over the 81 ionic configurations at the current state.
    pub fn ionic_sums(&mut self) -> SolverResult<PartitionSums<4>> {
        let dco = self.dco()?;
        let env = &*self.env;
        Ok(self
            .engine
            .evaluate(env.beta, |s| env.site_energy(s, dco))?)
    }
}

impl<E: HermitianEigensolver> MeanFieldSystem for DimerSystem<'_, E> {
    type State = DimerEnv;
    type Var = DimerVar;

    fn state(&self) -> &DimerEnv {
        &*self.env
    }

    fn state_mut(&mut self) -> &mut DimerEnv {
        &mut *self.env
    }

    fn unknowns(&self) -> Vec<DimerVar> {
        DimerVar::all()
    }

    fn ions_only(&self) -> bool {
        self.env.ions_only
    }

    fn residuals(&mut self, eqs: &[DimerVar]) -> SolverResult<DVector<f64>> {
        let needs_ions = eqs.iter().any(|v| !matches!(v, DimerVar::Mu));
        let moments = if needs_ions {
            let sums = self.ionic_sums()?;
            Some((sums.first, sums.second))
        } else {
            None
        };
        let (first, second) = moments.unwrap_or(([0.0; 4], [0.0; 4]));

        let mut out = DVector::zeros(eqs.len());
        for (i, eq) in eqs.iter().enumerate() {
            out[i] = match *eq {
                DimerVar::M(site) => self.env.moment(site) - first[site.index()],
                DimerVar::W(site) => self.env.second_moment(site) - second[site.index()],
                // 1 = <2 sum_a f(eps_a)>
                DimerVar::Mu => 1.0 - 2.0 * band_filling(&*self.env, &self.eigensolver),
            };
        }
        Ok(out)
    }

    fn final_report(&mut self) -> SolverResult<FinalReport> {
        let dco = self.dco()?;
        let sums = self.ionic_sums()?;

        let env = &*self.env;
        let f_el = if env.ions_only {
            0.0
        } else {
            2.0 * band_free_energy(env, &self.eigensolver)
        };
        let free_energy =
            sums.free_energy() + f_el + env.ion_constant() + env.ion_electron_constant(dco);

        Ok(FinalReport {
            expectations: vec![(DimerChannel::Dco.name(), dco)],
            free_energy,
        })
    }
}
