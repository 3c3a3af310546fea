//! Run metrics
//!
//! Accumulated tick by tick from the exchange's `TickReport`s.

use matching_engine::{OrderBook, TickReport};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::errors::ExchangeError;
use types::order::OrderDir;

use crate::error::SimulationError;

/// Aggregated counters over a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub ticks: u64,
    pub limit_orders: u64,
    pub market_orders: u64,
    pub cancels: u64,
    pub cancel_misses: u64,
    pub transactions: u64,
    pub traded_volume: u64,
    /// Sum of `volume × price` over every transaction
    pub traded_notional: Decimal,
    pub max_bid_levels: usize,
    pub max_ask_levels: usize,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tick into the totals. `book` is the book after the tick.
    pub fn record_tick(&mut self, report: &TickReport, book: &OrderBook) -> Result<(), SimulationError> {
        self.ticks += 1;
        self.limit_orders += report.limits as u64;
        self.market_orders += report.markets as u64;
        self.cancels += report.cancels as u64;
        self.cancel_misses += report.cancel_misses as u64;
        self.transactions += report.transactions.len() as u64;
        self.traded_volume += report.traded_volume();

        for transaction in &report.transactions {
            let notional = transaction
                .total_price()
                .and_then(|total| total.to_decimal())
                .map_err(ExchangeError::from)?;
            self.traded_notional += notional;
        }

        self.max_bid_levels = self.max_bid_levels.max(book.depth(OrderDir::Bid).len());
        self.max_ask_levels = self.max_ask_levels.max(book.depth(OrderDir::Ask).len());
        Ok(())
    }

    /// Volume-weighted average trade price
    pub fn average_price(&self) -> Option<Decimal> {
        if self.traded_volume == 0 {
            return None;
        }
        Some(self.traded_notional / Decimal::from(self.traded_volume))
    }

    pub fn summary(&self) -> String {
        format!(
            "Ticks: {} | Limits: {} | Markets: {} | Cancels: {} ({} missed) | Fills: {} | Volume: {} | Notional: {}",
            self.ticks,
            self.limit_orders,
            self.market_orders,
            self.cancels,
            self.cancel_misses,
            self.transactions,
            self.traded_volume,
            self.traded_notional,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use types::ids::{ParticipantId, Timestamp};
    use types::numeric::Money;
    use types::order::LimitOrderReq;
    use types::trade::TransactionRequest;

    fn book() -> OrderBook {
        let mut book = OrderBook::new();
        for (i, cents) in [9_800, 9_900].into_iter().enumerate() {
            let ts = Timestamp::new(i as u64);
            let req = LimitOrderReq::new(5, ParticipantId::new(1), Money::money(cents), OrderDir::Bid, ts).unwrap();
            book.insert(&req).unwrap();
        }
        book
    }

    fn fill(volume: u64, cents: i64) -> TransactionRequest {
        TransactionRequest::resolve(ParticipantId::new(2), ParticipantId::new(1), OrderDir::Bid, volume, Money::money(cents))
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = RunMetrics::new();
        assert_eq!(metrics.ticks, 0);
        assert_eq!(metrics.average_price(), None);
    }

    #[test]
    fn test_record_tick() {
        let report = TickReport {
            tick: 1,
            limits: 3,
            markets: 2,
            cancels: 2,
            cancel_misses: 1,
            transactions: vec![fill(3, 10_200), fill(1, 10_300)],
        };
        let mut metrics = RunMetrics::new();
        metrics.record_tick(&report, &book()).unwrap();

        assert_eq!(metrics.ticks, 1);
        assert_eq!(metrics.limit_orders, 3);
        assert_eq!(metrics.market_orders, 2);
        assert_eq!(metrics.cancel_misses, 1);
        assert_eq!(metrics.transactions, 2);
        assert_eq!(metrics.traded_volume, 4);
        assert_eq!(metrics.traded_notional, Decimal::new(40_900, 2));
        assert_eq!(metrics.average_price(), Some(Decimal::from_str("102.25").unwrap()));
        assert_eq!(metrics.max_bid_levels, 2);
        assert_eq!(metrics.max_ask_levels, 0);
    }

    #[test]
    fn test_level_maxima_keep_peak() {
        let mut metrics = RunMetrics::new();
        metrics.record_tick(&TickReport::default(), &book()).unwrap();
        metrics.record_tick(&TickReport::default(), &OrderBook::new()).unwrap();
        assert_eq!(metrics.ticks, 2);
        assert_eq!(metrics.max_bid_levels, 2);
    }
}
