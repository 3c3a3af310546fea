//! Participant strategies
//!
//! - `LiquidityProvider`: two-sided quotes around mid
//! - `NoiseTrader`: random market and passive limit orders
//! - `Idle`: never acts, owns the saturation orders

pub mod countdown;
pub mod liquidity_provider;
pub mod noise_trader;

pub use countdown::Countdown;
pub use liquidity_provider::LiquidityProvider;
pub use matching_engine::Idle;
pub use noise_trader::NoiseTrader;
