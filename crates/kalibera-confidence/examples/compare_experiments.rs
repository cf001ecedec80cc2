//! Compare two benchmark experiments with a bootstrap ratio interval
//!
//! Run with `RUST_LOG=debug` to see the resampling events.

use anyhow::Result;
use kalibera_confidence::{Bootstrap, BootstrapConfig, ConfidenceLevel};
use kalibera_core::HierarchicalDataset;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Three VM invocations, five iterations each
    let baseline = HierarchicalDataset::from_rows(
        vec![3, 5],
        vec![
            vec![10.2, 10.1, 10.4, 10.0, 10.3],
            vec![10.8, 10.6, 10.7, 10.9, 10.6],
            vec![10.1, 10.2, 10.0, 10.1, 10.3],
        ],
    )?;
    let optimised = HierarchicalDataset::from_rows(
        vec![3, 5],
        vec![
            vec![9.1, 9.3, 9.0, 9.2, 9.1],
            vec![9.6, 9.5, 9.7, 9.4, 9.6],
            vec![9.0, 9.1, 9.2, 8.9, 9.0],
        ],
    )?;

    let bootstrap = Bootstrap::new(
        BootstrapConfig::new()
            .with_iterations(10_000)
            .with_confidence_level(ConfidenceLevel::NINETY_NINE)
            .with_seed(2024),
    );

    let baseline_ci = bootstrap.confidence_interval(&baseline)?;
    let optimised_ci = bootstrap.confidence_interval(&optimised)?;
    let speedup = bootstrap.quotient(&baseline, &optimised)?;

    info!(%baseline_ci, %optimised_ci, "per-experiment intervals");
    println!("baseline:  {baseline_ci}");
    println!("optimised: {optimised_ci}");
    println!(
        "speedup at {}: {speedup}",
        bootstrap.config().confidence_level()
    );
    if speedup.lower > 1.0 {
        println!("the optimisation is a statistically significant improvement");
    }
    Ok(())
}
