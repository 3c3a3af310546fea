//! Matching logic module
//!
//! Turns a market order into fills against the contra side of the book.
//! Three allocation policies are available; all of them walk price levels
//! best-first and settle at the resting order's price.

pub mod executor;
pub mod fifo;
pub mod pro_rata;
pub mod random;

pub use executor::MatchExecutor;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use types::errors::MatchError;
use types::order::MarketOrderReq;
use types::trade::{self, TransactionRequest};

use crate::book::OrderBook;

/// How volume at a price level is shared between resting orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingPolicy {
    /// Price-time priority
    #[default]
    Fifo,
    /// Proportional to resting volume
    ProRata,
    /// Uniform draw without replacement
    RandomSelection,
}

impl fmt::Display for MatchingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchingPolicy::Fifo => write!(f, "fifo"),
            MatchingPolicy::ProRata => write!(f, "pro_rata"),
            MatchingPolicy::RandomSelection => write!(f, "random_selection"),
        }
    }
}

/// Market order matcher with a fixed policy
///
/// The rng is only consulted by [`MatchingPolicy::RandomSelection`].
#[derive(Debug, Clone)]
pub struct MatchingSystem<R = ChaCha8Rng> {
    policy: MatchingPolicy,
    executor: MatchExecutor,
    rng: R,
}

impl MatchingSystem<ChaCha8Rng> {
    pub fn new(policy: MatchingPolicy, seed: u64) -> Self {
        Self::with_rng(policy, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> MatchingSystem<R> {
    pub fn with_rng(policy: MatchingPolicy, rng: R) -> Self {
        Self {
            policy,
            executor: MatchExecutor::new(),
            rng,
        }
    }

    pub fn policy(&self) -> MatchingPolicy {
        self.policy
    }

    /// Fills executed over the system's lifetime
    pub fn fills(&self) -> u64 {
        self.executor.fills()
    }

    /// Match `req` against the contra side of `book`
    ///
    /// Fails without touching the book if the contra side holds less volume
    /// than requested. On success the transactions sum to exactly
    /// `req.volume`.
    pub fn execute(
        &mut self,
        req: &MarketOrderReq,
        book: &mut OrderBook,
    ) -> Result<Vec<TransactionRequest>, MatchError> {
        if req.volume == 0 {
            return Err(MatchError::InvalidVolume);
        }
        let contra = req.order_dir.contra();
        let available = book.total_volume(contra);
        if available < req.volume {
            return Err(MatchError::InsufficientLiquidity {
                dir: contra,
                requested: req.volume,
                available,
            });
        }

        let transactions = match self.policy {
            MatchingPolicy::Fifo => fifo::match_fifo(&mut self.executor, req, book)?,
            MatchingPolicy::ProRata => pro_rata::match_pro_rata(&mut self.executor, req, book)?,
            MatchingPolicy::RandomSelection => {
                random::match_random(&mut self.executor, req, book, &mut self.rng)?
            }
        };

        debug!(
            policy = %self.policy,
            participant = %req.participant_id,
            dir = %req.order_dir,
            volume = req.volume,
            fills = transactions.len(),
            "Market order matched"
        );
        debug_assert_eq!(trade::total_volume(&transactions), req.volume);

        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{ParticipantId, Timestamp};
    use types::numeric::Money;
    use types::order::{LimitOrderReq, OrderDir};

    fn book() -> OrderBook {
        let mut book = OrderBook::new();
        for (n, volume) in [(1u64, 20u64), (2, 30), (3, 50)] {
            book.insert(
                &LimitOrderReq::new(volume, ParticipantId::new(n), Money::money(10_200), OrderDir::Ask, Timestamp::new(n))
                    .unwrap(),
            ).unwrap();
        }
        book.insert(
            &LimitOrderReq::new(10, ParticipantId::new(4), Money::money(9_800), OrderDir::Bid, Timestamp::new(4))
                .unwrap(),
        ).unwrap();
        book
    }

    fn buy(volume: u64) -> MarketOrderReq {
        MarketOrderReq::new(volume, ParticipantId::new(99), OrderDir::Bid, Timestamp::new(100)).unwrap()
    }

    #[test]
    fn test_insufficient_liquidity_leaves_book_untouched() {
        for policy in [MatchingPolicy::Fifo, MatchingPolicy::ProRata, MatchingPolicy::RandomSelection] {
            let mut book = book();
            let mut system = MatchingSystem::new(policy, 1);

            let result = system.execute(&buy(101), &mut book);
            assert_eq!(
                result,
                Err(MatchError::InsufficientLiquidity {
                    dir: OrderDir::Ask,
                    requested: 101,
                    available: 100,
                })
            );
            assert_eq!(book.total_volume(OrderDir::Ask), 100);
            assert_eq!(book.order_count(OrderDir::Ask), 3);
        }
    }

    #[test]
    fn test_empty_contra_side_reports_zero_available() {
        let mut book = OrderBook::new();
        let mut system = MatchingSystem::new(MatchingPolicy::Fifo, 1);

        let result = system.execute(&buy(1), &mut book);
        assert_eq!(
            result,
            Err(MatchError::InsufficientLiquidity {
                dir: OrderDir::Ask,
                requested: 1,
                available: 0,
            })
        );
    }

    #[test]
    fn test_zero_volume_is_rejected() {
        let mut book = book();
        let mut system = MatchingSystem::new(MatchingPolicy::Fifo, 1);
        let mut req = buy(1);
        req.volume = 0;

        assert_eq!(system.execute(&req, &mut book), Err(MatchError::InvalidVolume));
    }

    #[test]
    fn test_every_policy_fills_exact_volume() {
        for policy in [MatchingPolicy::Fifo, MatchingPolicy::ProRata, MatchingPolicy::RandomSelection] {
            let mut book = book();
            let mut system = MatchingSystem::new(policy, 3);

            let fills = system.execute(&buy(40), &mut book).unwrap();
            assert_eq!(trade::total_volume(&fills), 40, "policy {policy}");
            assert_eq!(book.total_volume(OrderDir::Ask), 60, "policy {policy}");
            // Bids untouched by a buy
            assert_eq!(book.total_volume(OrderDir::Bid), 10);
        }
    }

    #[test]
    fn test_market_sell_hits_bids() {
        let mut book = book();
        let mut system = MatchingSystem::new(MatchingPolicy::Fifo, 1);
        let sell = MarketOrderReq::new(4, ParticipantId::new(99), OrderDir::Ask, Timestamp::new(100)).unwrap();

        let fills = system.execute(&sell, &mut book).unwrap();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].bidder_id, ParticipantId::new(4));
        assert_eq!(fills[0].asker_id, ParticipantId::new(99));
        assert_eq!(fills[0].price, Money::money(9_800));
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&MatchingPolicy::RandomSelection).unwrap();
        assert_eq!(json, "\"random_selection\"");
        let back: MatchingPolicy = serde_json::from_str("\"pro_rata\"").unwrap();
        assert_eq!(back, MatchingPolicy::ProRata);
    }
}
