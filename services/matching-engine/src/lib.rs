//! Matching Engine Service
//!
//! Single-instrument order book, market order matching and the exchange
//! tick loop that drives them.
//!
//! **Key Invariants:**
//! - Best bid is the highest resting bid, best ask the lowest resting ask
//! - A market order fills exactly its volume or fails with the book unchanged
//! - Deterministic matching (same inputs and seed → same outputs)
//! - Every transaction is settled before the next request is applied

pub mod book;
pub mod matching;
pub mod exchange;
pub mod saturation;
pub mod snapshot;

pub use book::{BookState, OrderBook, OrderHandle};
pub use exchange::{Applied, DecisionContext, Exchange, Idle, Participant, Strategy, TickReport};
pub use matching::{MatchingPolicy, MatchingSystem};
pub use saturation::SaturationConfig;
pub use snapshot::ExchangeSnapshot;
