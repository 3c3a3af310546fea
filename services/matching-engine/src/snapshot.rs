//! Serializable exchange snapshots
//!
//! One snapshot is captured before the first tick and one after every tick.
//! Money is exported as `rust_decimal::Decimal` so the JSON carries plain
//! decimal strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::errors::ExchangeError;
use types::ids::ParticipantId;
use types::order::OrderDir;

use crate::book::{LevelDepth, OrderBook};
use crate::exchange::Participant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub price: Decimal,
    pub orders: usize,
    pub volume: u64,
}

impl LevelSnapshot {
    fn from_depth(depth: &LevelDepth) -> Result<Self, ExchangeError> {
        Ok(Self {
            price: depth.price.to_decimal()?,
            orders: depth.order_count,
            volume: depth.volume,
        })
    }
}

/// Both sides of the book, best price first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub bids: Vec<LevelSnapshot>,
    pub asks: Vec<LevelSnapshot>,
}

impl BookSnapshot {
    pub fn capture(book: &OrderBook) -> Result<Self, ExchangeError> {
        let side = |dir: OrderDir| -> Result<Vec<LevelSnapshot>, ExchangeError> {
            book.depth(dir).iter().map(LevelSnapshot::from_depth).collect()
        };
        Ok(Self {
            bids: side(OrderDir::Bid)?,
            asks: side(OrderDir::Ask)?,
        })
    }

    pub fn order_count(&self, dir: OrderDir) -> usize {
        let levels = match dir {
            OrderDir::Bid => &self.bids,
            OrderDir::Ask => &self.asks,
        };
        levels.iter().map(|level| level.orders).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSnapshot {
    pub id: ParticipantId,
    pub strategy: String,
    pub capital: Decimal,
    pub shares: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeSnapshot {
    /// Ticks completed when the snapshot was taken; 0 before the run
    pub tick: u64,
    pub order_book: BookSnapshot,
    pub participants: Vec<ParticipantSnapshot>,
}

impl ExchangeSnapshot {
    pub fn capture(tick: u64, book: &OrderBook, participants: &[Participant]) -> Result<Self, ExchangeError> {
        let mut snapshots = participants
            .iter()
            .map(|p| {
                Ok(ParticipantSnapshot {
                    id: p.id(),
                    strategy: p.strategy_name().to_string(),
                    capital: p.account.capital.to_decimal()?,
                    shares: p.account.shares,
                })
            })
            .collect::<Result<Vec<_>, ExchangeError>>()?;
        // Polling order may be shuffled; exports list participants by id
        snapshots.sort_by_key(|p| p.id);

        Ok(Self {
            tick,
            order_book: BookSnapshot::capture(book)?,
            participants: snapshots,
        })
    }

    /// Sum of all participant capital
    pub fn total_capital(&self) -> Decimal {
        self.participants.iter().map(|p| p.capital).sum()
    }

    /// Sum of all participant shares
    pub fn total_shares(&self) -> i64 {
        self.participants.iter().map(|p| p.shares).sum()
    }
}
