//! Agent-based simulation of the single-instrument exchange
//!
//! Drives the matching engine's tick loop with liquidity providers and
//! noise traders, deterministically from a single seed.
//!
//! # Modules
//! - `config`: JSON-loadable run configuration
//! - `bots`: participant strategies
//! - `runner`: builds the exchange and steps it
//! - `metrics`: counters accumulated over a run
//! - `export`: snapshot series and metrics as JSON
//! - `error`: simulation error type

pub mod bots;
pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod runner;

pub use config::SimulationConfig;
pub use error::SimulationError;
pub use runner::{run, RunOutcome};

/// Crate version constant
pub const VERSION: &str = "1.0.0";
