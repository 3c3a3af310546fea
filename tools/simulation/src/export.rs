//! Run export
//!
//! Serializes the snapshot series, the metrics and the config that produced
//! them to JSON for external consumption.

use matching_engine::ExchangeSnapshot;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::metrics::RunMetrics;
use crate::runner::RunOutcome;

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationExport {
    pub version: String,
    pub config: SimulationConfig,
    pub metrics: RunMetrics,
    /// Pre-run snapshot followed by one per tick
    pub snapshots: Vec<ExchangeSnapshot>,
}

pub fn build_export(config: &SimulationConfig, outcome: RunOutcome) -> SimulationExport {
    SimulationExport {
        version: crate::VERSION.to_string(),
        config: config.clone(),
        metrics: outcome.metrics,
        snapshots: outcome.snapshots,
    }
}

/// Pretty JSON
pub fn export_json(export: &SimulationExport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(export)
}

pub fn write_to_file(export: &SimulationExport, path: impl AsRef<Path>) -> Result<(), SimulationError> {
    let json = export_json(export)?;
    std::fs::write(path, json)?;
    Ok(())
}
