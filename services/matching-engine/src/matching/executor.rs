//! Fill execution
//!
//! Applies one fill against a resting record and produces the resulting
//! transaction. The match price is always the resting order's price.

use tracing::trace;
use types::errors::MatchError;
use types::order::MarketOrderReq;
use types::trade::TransactionRequest;

use crate::book::{OrderBook, OrderHandle};

/// Executes fills and counts them
#[derive(Debug, Clone, Default)]
pub struct MatchExecutor {
    fills: u64,
}

impl MatchExecutor {
    pub fn new() -> Self {
        Self { fills: 0 }
    }

    /// Take `volume` from the record behind `handle` and settle it against `req`
    ///
    /// The record is reduced in place, or removed once exhausted.
    pub fn execute_fill(
        &mut self,
        book: &mut OrderBook,
        req: &MarketOrderReq,
        handle: &OrderHandle,
        volume: u64,
    ) -> Result<TransactionRequest, MatchError> {
        let resting = *book.get(handle).ok_or(MatchError::StaleHandle)?;
        if volume == 0 || volume > resting.volume {
            return Err(MatchError::InvalidVolume);
        }
        let provider = resting.participant_id;
        let left = book.consume(handle, volume).ok_or(MatchError::StaleHandle)?;
        self.fills += 1;

        trace!(
            initiator = %req.participant_id,
            provider = %provider,
            price = %handle.price,
            volume,
            left,
            "Fill executed"
        );

        Ok(TransactionRequest::resolve(
            req.participant_id,
            provider,
            req.order_dir,
            volume,
            handle.price,
        ))
    }

    /// Fills executed so far
    pub fn fills(&self) -> u64 {
        self.fills
    }
}
