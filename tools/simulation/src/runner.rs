//! Run driver
//!
//! Builds an exchange from a [`SimulationConfig`], registers the seeder,
//! the liquidity providers and the noise traders, saturates the book and
//! steps the tick loop, collecting a snapshot before the run and after
//! every tick.
//!
//! All randomness flows from one master `ChaCha8Rng` seeded with
//! `config.seed`, drawn in a fixed order: matching seed, bot seeds in
//! registration order, participant shuffle, saturation.

use matching_engine::{Exchange, ExchangeSnapshot, Idle, MatchingSystem};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::bots::{LiquidityProvider, NoiseTrader};
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::metrics::RunMetrics;

/// Snapshot series and metrics of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub snapshots: Vec<ExchangeSnapshot>,
    pub metrics: RunMetrics,
}

/// Build the exchange and bootstrap the book, without running any tick
pub fn prepare(config: &SimulationConfig) -> Result<Exchange, SimulationError> {
    config.validate()?;
    let mut master = ChaCha8Rng::seed_from_u64(config.seed);

    let matching = MatchingSystem::new(config.matching_policy, master.gen());
    let mut exchange = Exchange::new(matching);

    let saturation = &config.saturation;
    let seeder = exchange.add_participant(saturation.seeder_capital, saturation.seeder_shares, Box::new(Idle));

    let providers = &config.providers;
    for _ in 0..providers.count {
        let bot = LiquidityProvider::new(providers.clone(), master.gen());
        exchange.add_participant(providers.capital, providers.shares, Box::new(bot));
    }
    let takers = &config.takers;
    for _ in 0..takers.count {
        let bot = NoiseTrader::new(takers.clone(), master.gen());
        exchange.add_participant(takers.capital, takers.shares, Box::new(bot));
    }

    if config.shuffle_participants {
        exchange.shuffle_participants(&mut master);
    }
    exchange.saturate(seeder, saturation, &mut master)?;

    debug!(
        participants = exchange.participants().len(),
        policy = %config.matching_policy,
        "Exchange prepared"
    );
    Ok(exchange)
}

/// Run the whole simulation. Any exchange error aborts the run.
pub fn run(config: &SimulationConfig) -> Result<RunOutcome, SimulationError> {
    let mut exchange = prepare(config)?;
    let mut metrics = RunMetrics::new();
    let mut snapshots = Vec::new();
    snapshots.push(exchange.snapshot()?);

    for _ in 0..config.ticks {
        let report = exchange.tick()?;
        metrics.record_tick(&report, exchange.book())?;
        snapshots.push(exchange.snapshot()?);
    }

    info!(
        ticks = metrics.ticks,
        transactions = metrics.transactions,
        traded_volume = metrics.traded_volume,
        cancel_misses = metrics.cancel_misses,
        "Simulation finished"
    );
    Ok(RunOutcome { snapshots, metrics })
}
