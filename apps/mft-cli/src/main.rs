use clap::{Args, Parser, Subcommand};
use mft_app::{AppError, AppResult, PhaseGrid, SolveOutcome, SolveRequest};
use mft_solver::{SolveOptions, SolveStrategy, Tolerances};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "mft-cli")]
#[command(about = "Mean-field solver for coupled ionic and electronic order", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Residual tolerances shared by every solving command
#[derive(Args, Clone, Copy)]
struct ToleranceArgs {
    /// Residual norm accepted as converged
    #[arg(long, default_value_t = 1e-6)]
    eps: f64,
    /// Also accept a residual below this fraction of the starting residual
    #[arg(long, default_value_t = 0.0)]
    rel_eps: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a parameter file
    Validate {
        /// Path to the JSON or YAML parameter file
        input: PathBuf,
    },
    /// Solve from the order parameters stored in the file
    Solve {
        /// Path to the JSON or YAML parameter file
        input: PathBuf,
        /// Output path for the final state (JSON)
        output: PathBuf,
        #[command(flatten)]
        tol: ToleranceArgs,
        /// combined | staged
        #[arg(long, default_value = "combined")]
        strategy: String,
        /// Order parameter held at zero (repeatable)
        #[arg(long = "pin")]
        pins: Vec<String>,
        /// Drop the electronic sector
        #[arg(long)]
        ions_only: bool,
    },
    /// Solve from several starts and keep the lowest free energy
    Minimize {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        tol: ToleranceArgs,
        #[arg(long = "pin")]
        pins: Vec<String>,
    },
    /// Sample the anisotropy/temperature phase diagram
    Phase {
        /// Parameter file holding the fixed couplings
        base: PathBuf,
        /// Output prefix; results go to `<prefix>_phase.json`
        out_prefix: String,
        #[arg(long, default_value_t = 8)]
        num_b: usize,
        #[arg(long, default_value_t = 8)]
        num_t: usize,
        #[command(flatten)]
        tol: ToleranceArgs,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { input } => cmd_validate(&input),
        Commands::Solve {
            input,
            output,
            tol,
            strategy,
            pins,
            ions_only,
        } => cmd_solve(&input, &output, tol, &strategy, pins, ions_only),
        Commands::Minimize {
            input,
            output,
            tol,
            pins,
        } => cmd_minimize(&input, &output, tol, &pins),
        Commands::Phase {
            base,
            out_prefix,
            num_b,
            num_t,
            tol,
        } => cmd_phase(&base, &out_prefix, num_b, num_t, tol),
    }
}

fn options(tol: ToleranceArgs, strategy: SolveStrategy) -> AppResult<SolveOptions> {
    let tolerances = Tolerances {
        abs: tol.eps,
        rel: tol.rel_eps,
    };
    tolerances
        .validate()
        .map_err(|e| AppError::InvalidInput(format!("--eps/--rel-eps: {e}")))?;
    Ok(SolveOptions {
        tolerances,
        strategy,
    })
}

fn print_outcome(outcome: &SolveOutcome) {
    for (name, value) in &outcome.result.expectations {
        println!("  {name} = {value:.8}");
    }
    println!("  FreeEnergy = {:.10}", outcome.free_energy());
}

fn cmd_validate(input: &Path) -> AppResult<()> {
    println!("Validating parameters: {}", input.display());
    let model = mft_project::load_path(input)?;
    println!("✓ {} model is valid", model.kind());
    Ok(())
}

fn cmd_solve(
    input: &Path,
    output: &Path,
    tol: ToleranceArgs,
    strategy: &str,
    pins: Vec<String>,
    ions_only: bool,
) -> AppResult<()> {
    let strategy = strategy
        .parse::<SolveStrategy>()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;
    let request = SolveRequest {
        input_path: input,
        output_path: output,
        options: options(tol, strategy)?,
        pins,
        ions_only,
    };

    let start = Instant::now();
    let outcome = mft_app::run_solve(&request)?;
    println!(
        "✓ Converged in {} iterations (residual {:.3e}, {:.2}s)",
        outcome.iterations,
        outcome.residual_norm,
        start.elapsed().as_secs_f64()
    );
    print_outcome(&outcome);
    println!("  Written to {}", output.display());
    Ok(())
}

fn cmd_minimize(input: &Path, output: &Path, tol: ToleranceArgs, pins: &[String]) -> AppResult<()> {
    let model = mft_project::load_path(input)?;
    let minimum =
        mft_app::minimize_free_energy(&model, &options(tol, SolveStrategy::default())?, pins)?;
    let outcome = &minimum.best;
    mft_project::save_final_json(output, &outcome.result)?;

    println!("✓ Minimum free-energy state found");
    print_outcome(outcome);
    for start in &minimum.skipped {
        println!("  skipped start M={}, W={}: {}", start.m, start.w, start.reason);
    }
    println!("  Written to {}", output.display());
    Ok(())
}

fn cmd_phase(
    base: &Path,
    out_prefix: &str,
    num_b: usize,
    num_t: usize,
    tol: ToleranceArgs,
) -> AppResult<()> {
    let model = mft_project::load_path(base)?;
    let grid = PhaseGrid::new(num_b, num_t);
    println!(
        "Sampling {} phase diagram on a {}x{} grid",
        model.kind(),
        num_b,
        num_t
    );

    let start = Instant::now();
    let points = mft_app::sample_phase(&model, &grid, &options(tol, SolveStrategy::default())?)?;

    let results: Vec<_> = points
        .iter()
        .filter_map(|p| p.outcome.as_ref().map(|o| o.result.clone()))
        .collect();
    let path = PathBuf::from(format!("{out_prefix}_phase.json"));
    mft_project::save_final_json_list(&path, &results)?;
    tracing::info!(points = results.len(), path = %path.display(), "phase samples written");

    println!(
        "✓ {} of {} points converged ({:.2}s)",
        results.len(),
        points.len(),
        start.elapsed().as_secs_f64()
    );
    for point in points.iter().filter(|p| p.outcome.is_none()) {
        println!("  no convergence at B/J = {:.4}, T/J = {:.4}", point.b_ratio, point.t_ratio);
    }
    println!("  Written to {}", path.display());
    Ok(())
}
