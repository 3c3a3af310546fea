//! Book bootstrap
//!
//! Seeds both sides with limit orders so the book is two-sided before the
//! first tick. Bids land uniformly in `[center - far, center - close]`, asks
//! in `[center + close, center + far]`, so the seeded book never crosses.

use rand::Rng;
use serde::{Deserialize, Serialize};
use types::errors::{ExchangeError, NumericError};
use types::numeric::{Money, MONEY_SCALE};

/// Parameters of the initial book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaturationConfig {
    /// Orders placed on each side
    pub orders_per_side: usize,
    pub price_center: Money,
    /// Distance of the innermost quotes from the center
    pub close_offset: Money,
    /// Distance of the outermost quotes from the center
    pub far_offset: Money,
    pub min_volume: u64,
    pub max_volume: u64,
    /// Starting balance of the participant owning the seeded orders
    pub seeder_capital: Money,
    pub seeder_shares: i64,
}

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            orders_per_side: 50,
            price_center: Money::money(10_000),
            close_offset: Money::money(200),
            far_offset: Money::money(1_000),
            min_volume: 1,
            max_volume: 10,
            seeder_capital: Money::money(1_000_000),
            seeder_shares: 1_000,
        }
    }
}

impl SaturationConfig {
    pub fn validate(&self) -> Result<(), ExchangeError> {
        let invalid = |reason: &str| ExchangeError::InvalidConfig {
            reason: reason.to_string(),
        };
        if self.orders_per_side == 0 {
            return Err(invalid("saturation needs at least one order per side"));
        }
        if !self.close_offset.is_positive() || self.close_offset >= self.far_offset {
            return Err(invalid("saturation offsets must satisfy 0 < close < far"));
        }
        if !self.price_center.checked_sub(self.far_offset)?.is_positive() {
            return Err(invalid("lowest saturation bid must be positive"));
        }
        if self.min_volume == 0 || self.min_volume > self.max_volume {
            return Err(invalid("saturation volumes must satisfy 0 < min <= max"));
        }
        Ok(())
    }

    /// Inclusive bid price range in cents
    pub(crate) fn bid_range(&self) -> Result<(i64, i64), NumericError> {
        Ok((
            cents(self.price_center.checked_sub(self.far_offset)?)?,
            cents(self.price_center.checked_sub(self.close_offset)?)?,
        ))
    }

    /// Inclusive ask price range in cents
    pub(crate) fn ask_range(&self) -> Result<(i64, i64), NumericError> {
        Ok((
            cents(self.price_center.checked_add(self.close_offset)?)?,
            cents(self.price_center.checked_add(self.far_offset)?)?,
        ))
    }

    pub(crate) fn draw_volume<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.gen_range(self.min_volume..=self.max_volume)
    }
}

fn cents(value: Money) -> Result<i64, NumericError> {
    Ok(value.rescale(MONEY_SCALE)?.mantissa())
}

/// Uniform price in an inclusive cent range
pub(crate) fn draw_price<R: Rng + ?Sized>(rng: &mut R, (low, high): (i64, i64)) -> Money {
    Money::money(rng.gen_range(low..=high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_is_valid() {
        assert!(SaturationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_ranges() {
        let config = SaturationConfig::default();
        assert_eq!(config.bid_range().unwrap(), (9_000, 9_800));
        assert_eq!(config.ask_range().unwrap(), (10_200, 11_000));
    }

    #[test]
    fn test_rejects_inverted_offsets() {
        let config = SaturationConfig {
            close_offset: Money::money(1_000),
            far_offset: Money::money(200),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ExchangeError::InvalidConfig { .. })));
    }

    #[test]
    fn test_rejects_non_positive_bids() {
        let config = SaturationConfig {
            price_center: Money::money(500),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_draws_stay_in_range() {
        let config = SaturationConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let range = config.ask_range().unwrap();
        for _ in 0..200 {
            let price = draw_price(&mut rng, range);
            assert!(price >= Money::money(10_200) && price <= Money::money(11_000));
            let volume = config.draw_volume(&mut rng);
            assert!((1..=10).contains(&volume));
        }
    }

    #[test]
    fn test_deserializes_partial_config() {
        let config: SaturationConfig = serde_json::from_str(r#"{"orders_per_side": 5}"#).unwrap();
        assert_eq!(config.orders_per_side, 5);
        assert_eq!(config.max_volume, 10);
    }
}
