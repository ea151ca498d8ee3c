use bbx_optimizer::{drive, GridSearch, MaxIterations, OptimizerConfig, StopHandle};
use bbx_types::{FitnessFunction, ParameterVector, VariableDomain};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Upper bound on the demo's iterative run, whatever else is configured.
const DEMO_ITERATION_CAP: u64 = 1_000;

/// Concave bowl peaking at (learning_rate, depth) = (0.3, 6).
struct Bowl;

impl FitnessFunction for Bowl {
    fn evaluate(&self, vector: &ParameterVector) -> f64 {
        let lr = vector.get("learning_rate").unwrap_or(f64::NAN);
        let depth = vector.get("depth").unwrap_or(f64::NAN);
        -((lr - 0.3).powi(2) * 100.0 + (depth - 6.0).powi(2))
    }

    fn on_new_best(&self, fitness: f64, vector: &ParameterVector) {
        info!("new best {fitness:.4} at {vector}");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => OptimizerConfig::from_path(path)?,
        None => OptimizerConfig::default(),
    };

    let vector = ParameterVector::new()
        .with_variable(VariableDomain::continuous("learning_rate", 0.0, 1.0)?, 0.0)?
        .with_variable(VariableDomain::integer("depth", 1, 12)?, 1.0)?;

    let mut search: GridSearch = config.grid_search();
    let best = search.optimise(vector, &Bowl)?;
    match best {
        Some(best) => println!("best fitness {:.4} at {}", best.fitness, best.vector),
        None => println!("no finite best found"),
    }
    if let Some(report) = search.last_report() {
        println!(
            "{} evaluations in {} ms (finite best: {})",
            report.evaluations,
            report.duration().num_milliseconds(),
            report.found_finite_best()
        );
        println!("{}", serde_json::to_string_pretty(report)?);
    }
    search.dispose();

    // A decaying loss stands in for an iterative optimizer. Unlimited train
    // time or a zero improvement threshold alone would never stop it.
    let mut criteria = config
        .stopping_set()
        .with(MaxIterations::with_bound(DEMO_ITERATION_CAP));
    let outcome = drive(&mut criteria, &StopHandle::new(), 1.0, |i| {
        1.0 / (1.0 + i as f64)
    });
    println!(
        "iterative run stopped after {} iterations ({:?}) by {:?}",
        outcome.iterations,
        outcome.reason,
        criteria.stopped_by()
    );

    Ok(())
}
