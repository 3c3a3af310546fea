//! Derived book state
//!
//! A snapshot of the quantities participants decide on, recomputed once per
//! tick. Reading it never touches the live book.

use types::errors::{BookError, NumericError};
use types::numeric::{Fixed, Money};
use types::order::OrderDir;

/// Scale of the imbalance ratio (four decimal places)
pub const IMBALANCE_SCALE: i32 = -4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookState {
    pub best_bid: Money,
    pub best_ask: Money,
    pub mid_price: Money,
    /// Spread as a percentage of mid price
    pub quoted_spread: Money,
    pub abs_spread: Money,
    pub bid_count: usize,
    pub ask_count: usize,
    pub bid_volume: u64,
    pub ask_volume: u64,
    /// Record-count imbalance in [-1, 1]
    pub imbalance: Fixed,
}

impl BookState {
    pub fn best_price(&self, dir: OrderDir) -> Money {
        match dir {
            OrderDir::Bid => self.best_bid,
            OrderDir::Ask => self.best_ask,
        }
    }

    pub fn order_count(&self, dir: OrderDir) -> usize {
        match dir {
            OrderDir::Bid => self.bid_count,
            OrderDir::Ask => self.ask_count,
        }
    }

    pub fn volume(&self, dir: OrderDir) -> u64 {
        match dir {
            OrderDir::Bid => self.bid_volume,
            OrderDir::Ask => self.ask_volume,
        }
    }
}

/// `(bid - ask) / (bid + ask)` at [`IMBALANCE_SCALE`], truncated toward zero
pub fn imbalance_ratio(bid_count: usize, ask_count: usize) -> Result<Fixed, BookError> {
    let bid = i64::try_from(bid_count).map_err(|_| NumericError::Overflow)?;
    let ask = i64::try_from(ask_count).map_err(|_| NumericError::Overflow)?;
    let numerator = Fixed::new(bid - ask, 0)?.rescale(IMBALANCE_SCALE)?;
    let denominator = bid.checked_add(ask).ok_or(NumericError::Overflow)?;
    Ok(numerator.checked_div_int(denominator)?)
}

/// `100 × (ask - bid) / mid`
pub fn quoted_spread(best_bid: Money, best_ask: Money, mid: Money) -> Result<Money, NumericError> {
    best_ask.checked_sub(best_bid)?.checked_mul_int(100)?.checked_div(mid)
}

/// `(bid + ask) / 2`, truncated to the money scale
pub fn mid_price(best_bid: Money, best_ask: Money) -> Result<Money, NumericError> {
    best_bid.checked_add(best_ask)?.checked_div_int(2)
}
