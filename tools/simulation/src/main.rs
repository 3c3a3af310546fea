//! `simulate [config.json] [output.json]`
//!
//! Runs one simulation and writes the export. Without a config path the
//! defaults are used; without an output path the export goes to
//! `simulation.json`.

use simulation::config::SimulationConfig;
use simulation::{export, runner};
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT: &str = "simulation.json";

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            tracing::info!(path = %path, "Loading config");
            SimulationConfig::load(&path)?
        }
        None => SimulationConfig::default(),
    };
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    tracing::info!(
        ticks = config.ticks,
        seed = config.seed,
        policy = %config.matching_policy,
        "Starting simulation"
    );
    let outcome = runner::run(&config)?;
    tracing::info!("{}", outcome.metrics.summary());

    let export = export::build_export(&config, outcome);
    export::write_to_file(&export, &output)?;
    tracing::info!(path = %output, snapshots = export.snapshots.len(), "Export written");

    Ok(())
}
