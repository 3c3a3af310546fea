//! Limit order book for a single instrument
//!
//! Two [`BookSide`]s plus the cached [`BookState`]. Price queries fail with
//! [`BookError::EmptySide`] rather than returning a sentinel, so callers
//! cannot mistake an empty side for a price.

use tracing::debug;
use types::errors::{BookError, OrderError};
use types::ids::{ParticipantId, Timestamp};
use types::numeric::{Fixed, Money};
use types::order::{CancelOrderReq, LimitOrderReq, OrderDir, RestingOrder};

use super::side::{BookSide, LevelDepth, OrderHandle};
use super::state::{self, BookState};

#[derive(Debug, Clone)]
pub struct OrderBook {
    bids: BookSide,
    asks: BookSide,
    state: Option<BookState>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            bids: BookSide::new(OrderDir::Bid),
            asks: BookSide::new(OrderDir::Ask),
            state: None,
        }
    }

    fn side(&self, dir: OrderDir) -> &BookSide {
        match dir {
            OrderDir::Bid => &self.bids,
            OrderDir::Ask => &self.asks,
        }
    }

    fn side_mut(&mut self, dir: OrderDir) -> &mut BookSide {
        match dir {
            OrderDir::Bid => &mut self.bids,
            OrderDir::Ask => &mut self.asks,
        }
    }

    /// Rest a limit order on its side at its price
    ///
    /// Requests are re-validated here since their fields are public.
    pub fn insert(&mut self, req: &LimitOrderReq) -> Result<OrderHandle, OrderError> {
        if req.volume == 0 {
            return Err(OrderError::InvalidVolume);
        }
        if !req.price.is_positive() {
            return Err(OrderError::InvalidPrice);
        }
        debug!(
            participant = %req.participant_id,
            dir = %req.order_dir,
            price = %req.price,
            volume = req.volume,
            "Resting limit order"
        );
        Ok(self.side_mut(req.order_dir).insert(req.price, req.to_resting()))
    }

    pub fn best_price(&self, dir: OrderDir) -> Result<Money, BookError> {
        self.side(dir).best_price().ok_or(BookError::EmptySide { dir })
    }

    fn best_prices(&self) -> Result<(Money, Money), BookError> {
        Ok((self.best_price(OrderDir::Bid)?, self.best_price(OrderDir::Ask)?))
    }

    pub fn mid_price(&self) -> Result<Money, BookError> {
        let (bid, ask) = self.best_prices()?;
        Ok(state::mid_price(bid, ask)?)
    }

    /// Spread as a percentage of mid price
    pub fn quoted_spread(&self) -> Result<Money, BookError> {
        let (bid, ask) = self.best_prices()?;
        let mid = state::mid_price(bid, ask)?;
        Ok(state::quoted_spread(bid, ask, mid)?)
    }

    pub fn abs_spread(&self) -> Result<Money, BookError> {
        let (bid, ask) = self.best_prices()?;
        Ok(ask.checked_sub(bid)?)
    }

    /// Number of resting records on a side
    pub fn order_count(&self, dir: OrderDir) -> usize {
        self.side(dir).order_count()
    }

    /// Total resting volume on a side
    pub fn total_volume(&self, dir: OrderDir) -> u64 {
        self.side(dir).total_volume()
    }

    /// `(bids - asks) / (bids + asks)` over record counts
    pub fn imbalance(&self) -> Result<Fixed, BookError> {
        self.best_prices()?;
        state::imbalance_ratio(self.bids.order_count(), self.asks.order_count())
    }

    /// Every record at the best price of `dir`, with a handle to each
    pub fn orders_at_best_price(&self, dir: OrderDir) -> Result<Vec<(OrderHandle, RestingOrder)>, BookError> {
        let orders = self.side(dir).best_level_orders();
        if orders.is_empty() {
            return Err(BookError::EmptySide { dir });
        }
        Ok(orders)
    }

    /// Earliest record at the best price of `dir`
    pub fn earliest_at_best_price(&self, dir: OrderDir) -> Result<(OrderHandle, RestingOrder), BookError> {
        self.side(dir).best_earliest().ok_or(BookError::EmptySide { dir })
    }

    pub fn get(&self, handle: &OrderHandle) -> Option<&RestingOrder> {
        self.side(handle.dir).get(handle)
    }

    /// Remove the record behind `handle`; None if it is already gone
    pub fn remove(&mut self, handle: &OrderHandle) -> Option<RestingOrder> {
        self.side_mut(handle.dir).remove(handle)
    }

    /// Take `volume` out of a resting record, returning what is left
    pub fn consume(&mut self, handle: &OrderHandle, volume: u64) -> Option<u64> {
        self.side_mut(handle.dir).consume(handle, volume)
    }

    /// Remove the oldest record of `participant_id` on `dir`
    pub fn remove_earliest_by_participant(&mut self, participant_id: ParticipantId, dir: OrderDir) -> bool {
        self.side_mut(dir)
            .remove_earliest_by_participant(participant_id)
            .is_some()
    }

    /// Remove the record on `dir` with this owner and timestamp
    pub fn remove_specific(&mut self, participant_id: ParticipantId, timestamp: Timestamp, dir: OrderDir) -> bool {
        self.side_mut(dir).remove_specific(participant_id, timestamp).is_some()
    }

    /// Apply a cancel request. A miss is not an error: the target may
    /// already have been filled.
    pub fn cancel(&mut self, req: &CancelOrderReq) -> bool {
        let removed = self
            .side_mut(req.order_dir)
            .remove_at(req.price, req.participant_id, req.order_timestamp)
            .is_some();
        debug!(
            participant = %req.participant_id,
            dir = %req.order_dir,
            price = %req.price,
            removed,
            "Cancel applied"
        );
        removed
    }

    /// Recompute the cached state from the live book
    pub fn refresh_state(&mut self) -> Result<&BookState, BookError> {
        let (best_bid, best_ask) = self.best_prices()?;
        let mid_price = state::mid_price(best_bid, best_ask)?;
        let computed = BookState {
            best_bid,
            best_ask,
            mid_price,
            quoted_spread: state::quoted_spread(best_bid, best_ask, mid_price)?,
            abs_spread: best_ask.checked_sub(best_bid)?,
            bid_count: self.bids.order_count(),
            ask_count: self.asks.order_count(),
            bid_volume: self.bids.total_volume(),
            ask_volume: self.asks.total_volume(),
            imbalance: state::imbalance_ratio(self.bids.order_count(), self.asks.order_count())?,
        };
        Ok(&*self.state.insert(computed))
    }

    /// Last computed state
    pub fn state(&self) -> Result<&BookState, BookError> {
        self.state.as_ref().ok_or(BookError::StateNotComputed)
    }

    /// Aggregated levels of a side, best price first
    pub fn depth(&self, dir: OrderDir) -> Vec<LevelDepth> {
        self.side(dir).depth()
    }

    /// Every resting record on a side with its price, best price first
    pub fn orders(&self, dir: OrderDir) -> impl Iterator<Item = (Money, &RestingOrder)> + '_ {
        self.side(dir).iter_orders()
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
