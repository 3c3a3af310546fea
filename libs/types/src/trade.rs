//! Transaction requests emitted by matching
//!
//! A match happens between an initiator (the market-order submitter) and a
//! provider (the owner of the resting order it hit). Settlement only cares
//! about who bought and who sold, so the pair is resolved into
//! bidder/asker here.

use crate::errors::NumericError;
use crate::ids::ParticipantId;
use crate::numeric::Money;
use crate::order::OrderDir;
use serde::{Deserialize, Serialize};

/// One fill to be settled between two participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub bidder_id: ParticipantId,
    pub asker_id: ParticipantId,
    pub volume: u64,
    /// Per-unit price the fill matched at
    pub price: Money,
}

impl TransactionRequest {
    /// Resolve initiator/provider into bidder/asker using the market order's direction
    pub fn resolve(
        initiator: ParticipantId,
        provider: ParticipantId,
        initiator_dir: OrderDir,
        volume: u64,
        price: Money,
    ) -> Self {
        let (bidder_id, asker_id) = match initiator_dir {
            OrderDir::Bid => (initiator, provider),
            OrderDir::Ask => (provider, initiator),
        };
        Self { bidder_id, asker_id, volume, price }
    }

    /// `volume × price`
    pub fn total_price(&self) -> Result<Money, NumericError> {
        let volume = i64::try_from(self.volume).map_err(|_| NumericError::Overflow)?;
        self.price.checked_mul_int(volume)
    }
}

/// Sum of volumes across a batch of transactions
pub fn total_volume(transactions: &[TransactionRequest]) -> u64 {
    transactions.iter().map(|t| t.volume).sum()
}
