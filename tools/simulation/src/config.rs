//! Simulation configuration
//!
//! Every struct deserializes from JSON with missing fields taking their
//! defaults, so a config file only needs to name what it changes.

use matching_engine::{MatchingPolicy, SaturationConfig};
use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use types::numeric::Money;

use crate::error::SimulationError;

/// Upper bound on `ticks`; every tick keeps a full snapshot in memory
pub const MAX_TICKS: u64 = 1_000_000;

/// Inclusive range a value is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T> Bounds<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + Copy + SampleUniform> Bounds<T> {
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.gen_range(self.min..=self.max)
    }
}

/// Quoting participants that keep both sides of the book populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidityProviderConfig {
    pub count: usize,
    pub capital: Money,
    pub shares: i64,
    /// Distance of each quote from mid, in cents
    pub half_spread_cents: Bounds<i64>,
    pub volume: Bounds<u64>,
    /// Ticks between quote refreshes
    pub interarrival: Bounds<u32>,
    /// Oldest quotes are cancelled beyond this many
    pub max_outstanding_quotes: usize,
}

impl Default for LiquidityProviderConfig {
    fn default() -> Self {
        Self {
            count: 70,
            capital: Money::money(1_000_000),
            shares: 100,
            half_spread_cents: Bounds::new(5, 150),
            volume: Bounds::new(1, 10),
            interarrival: Bounds::new(1, 5),
            max_outstanding_quotes: 10,
        }
    }
}

/// Participants submitting random market and limit orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseTraderConfig {
    pub count: usize,
    pub capital: Money,
    pub shares: i64,
    /// Chance, in percent, that an order is a market order
    pub market_order_percent: u32,
    pub volume: Bounds<u64>,
    /// Distance behind the best price for limit orders, in cents
    pub limit_offset_cents: Bounds<i64>,
    pub interarrival: Bounds<u32>,
    /// A market order takes at most `contra volume / depth_share_divisor`
    pub depth_share_divisor: u64,
}

impl Default for NoiseTraderConfig {
    fn default() -> Self {
        Self {
            count: 100,
            capital: Money::money(1_000_000),
            shares: 100,
            market_order_percent: 30,
            volume: Bounds::new(1, 5),
            limit_offset_cents: Bounds::new(0, 100),
            interarrival: Bounds::new(1, 10),
            depth_share_divisor: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub ticks: u64,
    pub seed: u64,
    pub matching_policy: MatchingPolicy,
    /// Permute the participant polling order once before the run
    pub shuffle_participants: bool,
    pub saturation: SaturationConfig,
    pub providers: LiquidityProviderConfig,
    pub takers: NoiseTraderConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 200,
            seed: 42,
            matching_policy: MatchingPolicy::Fifo,
            shuffle_participants: true,
            saturation: SaturationConfig::default(),
            providers: LiquidityProviderConfig::default(),
            takers: NoiseTraderConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.ticks > MAX_TICKS {
            return Err(invalid("tick count exceeds the supported maximum"));
        }
        self.saturation.validate()?;

        let providers = &self.providers;
        if !providers.half_spread_cents.is_valid() || providers.half_spread_cents.min < 1 {
            return Err(invalid("provider half spread must be at least one cent"));
        }
        if !providers.volume.is_valid() || providers.volume.min == 0 {
            return Err(invalid("provider volume must be positive"));
        }
        if !providers.interarrival.is_valid() || providers.interarrival.min == 0 {
            return Err(invalid("provider interarrival must be at least one tick"));
        }

        let takers = &self.takers;
        if takers.market_order_percent > 100 {
            return Err(invalid("market order percent must be at most 100"));
        }
        if !takers.volume.is_valid() || takers.volume.min == 0 {
            return Err(invalid("taker volume must be positive"));
        }
        if !takers.limit_offset_cents.is_valid() || takers.limit_offset_cents.min < 0 {
            return Err(invalid("taker limit offset must be non-negative"));
        }
        if !takers.interarrival.is_valid() || takers.interarrival.min == 0 {
            return Err(invalid("taker interarrival must be at least one tick"));
        }
        // Market demand within one tick must stay below the snapshot depth
        if takers.depth_share_divisor == 0 || (takers.depth_share_divisor as usize) < takers.count {
            return Err(invalid("depth share divisor must be at least the taker count"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> SimulationError {
    SimulationError::Config(reason.to_string())
}
