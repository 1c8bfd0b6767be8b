//! Momentum-averaged bond expectation values.

use crate::bzone::average_n;
use crate::eigen::{Eigensystem, HermitianEigensolver};
use crate::error::{ElectronError, ElectronResult};
use mft_core::fermi;
use mft_model::{ChannelSpec, ElectronicModel};
use nalgebra::Complex;

/// Largest tolerated magnitude of a channel's discarded part.
pub const SYMMETRY_TOL: f64 = 1e-12;

/// `sum_a conj(psi_a[left]) psi_a[right] f(eps_a)` for one k point.
pub fn bond_expectation(es: &Eigensystem, left: usize, right: usize, beta: f64) -> Complex<f64> {
    let mut ev = Complex::new(0.0, 0.0);
    for (a, &energy) in es.energies.iter().enumerate() {
        let occ = fermi(beta, energy);
        ev += es.vectors[(left, a)].conj() * es.vectors[(right, a)] * occ;
    }
    ev
}

/// Evaluate one channel over the model's k mesh.
///
/// The kept part and the discarded part are averaged in the same pass; a
/// discarded part above [`SYMMETRY_TOL`] is an error.
pub fn evaluate_channel<M, E>(model: &M, spec: &ChannelSpec, solver: &E) -> ElectronResult<f64>
where
    M: ElectronicModel,
    E: HermitianEigensolver,
{
    let beta = model.beta();
    let check_scale = spec.check_scale.unwrap_or(0.0);
    let [value, check] = average_n(model.mesh_size(), |k| {
        let es = solver.eigensystem(&model.hamiltonian(k));
        let ev = bond_expectation(&es, spec.left, spec.right, beta);
        let w = (spec.weight)(k);
        [
            spec.scale * w * spec.part.of(ev),
            check_scale * w * spec.part.other().of(ev),
        ]
    });

    if spec.check_scale.is_some() && !(check.abs() <= SYMMETRY_TOL) {
        return Err(ElectronError::SymmetryViolation {
            channel: spec.name,
            residual: check,
        });
    }
    if !value.is_finite() {
        return Err(ElectronError::NonFinite {
            channel: spec.name,
            value,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eigen::NalgebraEigensolver;
    use mft_model::{Channel, CubicChannel, CubicEnv, DimerChannel, DimerEnv, Part};

    fn cubic_env() -> CubicEnv {
        CubicEnv {
            bz_points_per_dim: 6,
            tae: 0.2,
            tce: 1.0,
            tbe: 0.4,
            tao: 0.08,
            tco: 0.4,
            tbo: 0.16,
            m: 0.5,
            w: 0.5,
            beta: 10.0,
            epsilon_m: 0.05,
            epsilon_r: 0.05,
            ..CubicEnv::default()
        }
    }

    #[test]
    fn bond_expectation_of_diagonal_matrix() {
        let es = Eigensystem {
            energies: [-1.0, 1.0, -2.0, 2.0],
            vectors: mft_model::HMatrix::identity(),
        };
        let ev = bond_expectation(&es, 0, 0, f64::INFINITY);
        assert_eq!(ev, Complex::new(1.0, 0.0));
        assert_eq!(bond_expectation(&es, 1, 1, f64::INFINITY), Complex::new(0.0, 0.0));
        assert_eq!(bond_expectation(&es, 0, 2, 1.0), Complex::new(0.0, 0.0));
    }

    #[test]
    fn cubic_channels_pass_symmetry_check() {
        let env = cubic_env();
        for channel in CubicChannel::all() {
            let value = evaluate_channel(&env, &channel.spec(), &NalgebraEigensolver).unwrap();
            assert!(value.is_finite(), "{channel:?}");
        }
    }

    #[test]
    fn odd_channels_vanish_without_order() {
        let env = CubicEnv { m: 0.0, ..cubic_env() };
        for channel in [CubicChannel::Dao, CubicChannel::Dco] {
            let value = evaluate_channel(&env, &channel.spec(), &NalgebraEigensolver).unwrap();
            assert!(value.abs() < 1e-10, "{channel:?} = {value}");
        }
    }

    #[test]
    fn dimer_channel_passes_symmetry_check() {
        let env = DimerEnv {
            bz_points_per_dim: 6,
            m01: 0.8,
            m12: 0.8,
            tce: 0.5,
            tco: 0.3,
            tbe: 0.2,
            beta: 20.0,
            ..DimerEnv::default()
        };
        let value = evaluate_channel(&env, &DimerChannel::Dco.spec(), &NalgebraEigensolver)
            .unwrap();
        assert!(value.is_finite());
    }

    /// k-independent model with an imaginary bond, which the real-part
    /// channel below treats as forbidden.
    struct Skewed;

    impl ElectronicModel for Skewed {
        fn mesh_size(&self) -> usize {
            2
        }

        fn beta(&self) -> f64 {
            f64::INFINITY
        }

        fn hamiltonian(&self, _k: &mft_model::KPoint) -> mft_model::HMatrix {
            mft_model::HermitianBuilder::new()
                .diagonal(0, -1.0)
                .diagonal(1, 1.0)
                .diagonal(2, 3.0)
                .diagonal(3, 4.0)
                .upper(0, 1, Complex::new(0.0, 0.5))
                .build()
        }

        fn hoppings_finite(&self) -> bool {
            true
        }

        fn dependency_key(&self) -> mft_model::DependencyKey {
            mft_model::DependencyKey::from_values(&[])
        }
    }

    #[test]
    fn broken_symmetry_is_reported() {
        let spec = ChannelSpec {
            name: "skewed",
            left: 0,
            right: 1,
            weight: |_| 1.0,
            part: Part::Re,
            scale: 1.0,
            check_scale: Some(1.0),
        };
        let err = evaluate_channel(&Skewed, &spec, &NalgebraEigensolver).unwrap_err();
        assert!(matches!(
            err,
            ElectronError::SymmetryViolation {
                channel: "skewed",
                ..
            }
        ));

        let unchecked = ChannelSpec {
            check_scale: None,
            ..spec
        };
        assert!(evaluate_channel(&Skewed, &unchecked, &NalgebraEigensolver).is_ok());
    }
}
