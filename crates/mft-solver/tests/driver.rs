use mft_electrons::CountingEigensolver;
use mft_ions::{PartitionEngine, SingleSiteLevels};
use mft_model::{CubicEnv, CubicVar, DimerEnv, DimerVar, Site};
use mft_solver::{
    CubicSystem, MeanFieldSystem, SolveOptions, SolveStrategy, SolverError, Tolerances, solve,
    solve_cubic, solve_dimer,
};

fn ionic_cubic(beta: f64) -> CubicEnv {
    CubicEnv {
        bz_points_per_dim: 4,
        beta,
        b: 0.5,
        ja: 0.5,
        jc: 0.25,
        m: 1.0,
        w: 1.0,
        ions_only: true,
        ..CubicEnv::default()
    }
}

fn electronic_cubic(beta: f64) -> CubicEnv {
    CubicEnv {
        bz_points_per_dim: 4,
        tae: 0.2,
        tce: 1.0,
        tbe: 0.4,
        tao: 0.08,
        tco: 0.4,
        tbo: 0.16,
        m: 1.0,
        w: 1.0,
        mu: -2.0,
        beta,
        b: 0.01,
        ja: 0.5,
        jc: 0.25,
        epsilon_m: 0.05,
        epsilon_r: 0.05,
        ..CubicEnv::default()
    }
}

#[test]
fn ions_only_ordered_fixed_point() {
    let mut env = ionic_cubic(10.0);
    let (solution, report) = solve_cubic(&mut env, &SolveOptions::default(), &[]).unwrap();

    assert_eq!(solution.vars, vec![CubicVar::M, CubicVar::W]);
    assert!((env.m - 1.0).abs() < 1e-6);
    assert!((env.w - 1.0).abs() < 1e-6);
    assert_eq!(report.expectation("Dao"), Some(0.0));

    let levels = SingleSiteLevels {
        gap: env.delta_s(),
        field: env.m * env.qj_ion(),
    };
    assert!((levels.moment(env.beta).unwrap() - env.m).abs() < 1e-6);
}

#[test]
fn ions_only_disordered_fixed_point() {
    let mut env = ionic_cubic(0.1);
    solve_cubic(&mut env, &SolveOptions::default(), &[]).unwrap();

    let e = (-0.1_f64 * 0.5).exp();
    let w_expected = 2.0 * e / (1.0 + 2.0 * e);
    assert!(env.m.abs() < 1e-6);
    assert!((env.w - w_expected).abs() < 1e-6);
}

#[test]
fn loose_relative_tolerance_stops_early() {
    let mut strict = ionic_cubic(0.1);
    let (full, _) = solve_cubic(&mut strict, &SolveOptions::default(), &[]).unwrap();

    let mut loose = ionic_cubic(0.1);
    let options = SolveOptions {
        tolerances: Tolerances { abs: 1e-6, rel: 0.5 },
        ..SolveOptions::default()
    };
    let (early, _) = solve_cubic(&mut loose, &options, &[]).unwrap();

    assert!(early.iterations < full.iterations);
    assert!(early.residual_norm > full.residual_norm);
    assert!(full.residual_norm < 1e-6);
}

#[test]
fn invalid_tolerance_is_rejected() {
    let mut env = ionic_cubic(10.0);
    let options = SolveOptions {
        tolerances: Tolerances { abs: 1e-6, rel: -1.0 },
        ..SolveOptions::default()
    };
    assert!(matches!(
        solve_cubic(&mut env, &options, &[]),
        Err(SolverError::Core(_))
    ));
}

#[test]
fn ions_only_never_diagonalizes() {
    let mut env = ionic_cubic(10.0);
    let mut system = CubicSystem::with_eigensolver(&mut env, <CountingEigensolver>::default());
    solve(&mut system, &SolveOptions::default(), &[]).unwrap();
    system.final_report().unwrap();
    assert_eq!(system.eigensolver().calls(), 0);
    assert_eq!(system.cache().recomputations(), 0);
}

#[test]
fn pinned_order_parameter_stays_zero() {
    let mut env = ionic_cubic(10.0);
    let (solution, _) = solve_cubic(&mut env, &SolveOptions::default(), &[CubicVar::M]).unwrap();

    assert_eq!(env.m, 0.0);
    assert_eq!(solution.vars, vec![CubicVar::W]);
    assert_eq!(solution.value(CubicVar::M), None);
    // with M = 0 only the gap matters
    let levels = SingleSiteLevels {
        gap: env.delta_s(),
        field: 0.0,
    };
    assert!((levels.second_moment(env.beta).unwrap() - env.w).abs() < 1e-6);
}

#[test]
fn everything_pinned_is_a_no_op() {
    let mut env = ionic_cubic(10.0);
    let (solution, _) =
        solve_cubic(&mut env, &SolveOptions::default(), &[CubicVar::M, CubicVar::W]).unwrap();
    assert!(solution.is_empty());
    assert_eq!(solution.iterations, 0);
    assert_eq!((env.m, env.w), (0.0, 0.0));
}

#[test]
fn chemical_potential_cannot_be_pinned() {
    let mut env = electronic_cubic(10.0);
    let err = solve_cubic(&mut env, &SolveOptions::default(), &[CubicVar::Mu]).unwrap_err();
    assert!(matches!(err, SolverError::ProblemSetup { .. }));
}

#[test]
fn invalid_environment_is_rejected_before_solving() {
    let mut env = electronic_cubic(-1.0);
    assert!(matches!(
        solve_cubic(&mut env, &SolveOptions::default(), &[]),
        Err(SolverError::Model(_))
    ));
}

#[test]
fn staged_and_combined_agree() {
    let mut combined = electronic_cubic(10.0);
    let (_, combined_report) =
        solve_cubic(&mut combined, &SolveOptions::default(), &[]).unwrap();

    let mut staged = electronic_cubic(10.0);
    let options = SolveOptions {
        strategy: SolveStrategy::Staged,
        ..SolveOptions::default()
    };
    let (solution, staged_report) = solve_cubic(&mut staged, &options, &[]).unwrap();

    assert_eq!(solution.vars, vec![CubicVar::M, CubicVar::W, CubicVar::Mu]);
    assert!(solution.residual_norm < 1e-6);
    assert!((combined.m - staged.m).abs() < 1e-5);
    assert!((combined.w - staged.w).abs() < 1e-5);
    assert!((combined.mu - staged.mu).abs() < 1e-5);
    let dao = |r: &mft_solver::FinalReport| r.expectation("Dao").unwrap();
    assert!((dao(&combined_report) - dao(&staged_report)).abs() < 1e-5);
}

#[test]
fn electronic_solution_fills_quarter_band() {
    let mut env = electronic_cubic(10.0);
    let (_, report) = solve_cubic(&mut env, &SolveOptions::default(), &[]).unwrap();
    let filling = mft_electrons::band_filling(&env, &mft_electrons::NalgebraEigensolver);
    assert!((filling - 1.0).abs() < 1e-6);
    assert_eq!(report.expectations.len(), 6);
    assert!(report.free_energy.is_finite());
}

#[test]
fn dimer_ions_only_matches_enumeration() {
    let mut env = DimerEnv {
        bz_points_per_dim: 4,
        beta: 5.0,
        bxy0: 0.2,
        bzz0: 0.1,
        jb0: 0.1,
        jc0: 0.4,
        m01: 1.0,
        m11: 1.0,
        m02: 1.0,
        m12: 1.0,
        w01: 1.0,
        w11: 1.0,
        w02: 1.0,
        w12: 1.0,
        ..DimerEnv::default()
    }
    .ions_only_env();

    let (solution, report) = solve_dimer(&mut env, &SolveOptions::default(), &[]).unwrap();
    assert_eq!(solution.vars.len(), 8);
    assert!(!solution.vars.contains(&DimerVar::Mu));

    let engine = PartitionEngine::<4>::new();
    let sums = engine.evaluate(env.beta, |s| env.site_energy(s, 0.0)).unwrap();
    for site in Site::ALL {
        assert!((sums.first[site.index()] - env.moment(site)).abs() < 1e-6);
        assert!((sums.second[site.index()] - env.second_moment(site)).abs() < 1e-6);
    }
    let expected = sums.free_energy() + env.ion_constant();
    assert!((report.free_energy - expected).abs() < 1e-12);
}

#[test]
fn dimer_pins_remove_equations() {
    let mut env = DimerEnv {
        beta: 5.0,
        bxy0: 0.2,
        bzz0: 0.1,
        jb0: 0.1,
        jc0: 0.4,
        m01: 0.5,
        m12: 0.5,
        ..DimerEnv::default()
    }
    .ions_only_env();
    let pins = [DimerVar::M(Site::S11), DimerVar::M(Site::S02)];
    let (solution, _) = solve_dimer(&mut env, &SolveOptions::default(), &pins).unwrap();
    assert_eq!(solution.vars.len(), 6);
    assert_eq!(env.m11, 0.0);
    assert_eq!(env.m02, 0.0);
}
