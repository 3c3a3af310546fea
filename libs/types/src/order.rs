//! Order request types
//!
//! Requests are immutable values submitted by participants once per tick.
//! A limit request becomes a [`RestingOrder`] when it enters the book; the
//! direction is dropped because the side it rests on encodes it.

use crate::errors::OrderError;
use crate::ids::{ParticipantId, Timestamp};
use crate::numeric::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDir {
    /// Buy side
    Bid,
    /// Sell side
    Ask,
}

impl OrderDir {
    /// The contra side. `d.contra().contra() == d`.
    pub fn contra(&self) -> Self {
        match self {
            OrderDir::Bid => OrderDir::Ask,
            OrderDir::Ask => OrderDir::Bid,
        }
    }
}

impl fmt::Display for OrderDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDir::Bid => write!(f, "Bid"),
            OrderDir::Ask => write!(f, "Ask"),
        }
    }
}

/// Fill immediately against the contra side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MarketOrderRepr")]
pub struct MarketOrderReq {
    pub volume: u64,
    pub participant_id: ParticipantId,
    pub order_dir: OrderDir,
    pub timestamp: Timestamp,
}

impl MarketOrderReq {
    pub fn new(
        volume: u64,
        participant_id: ParticipantId,
        order_dir: OrderDir,
        timestamp: Timestamp,
    ) -> Result<Self, OrderError> {
        if volume == 0 {
            return Err(OrderError::InvalidVolume);
        }
        Ok(Self { volume, participant_id, order_dir, timestamp })
    }
}

#[derive(Deserialize)]
struct MarketOrderRepr {
    volume: u64,
    participant_id: ParticipantId,
    order_dir: OrderDir,
    timestamp: Timestamp,
}

impl TryFrom<MarketOrderRepr> for MarketOrderReq {
    type Error = OrderError;

    fn try_from(repr: MarketOrderRepr) -> Result<Self, Self::Error> {
        MarketOrderReq::new(repr.volume, repr.participant_id, repr.order_dir, repr.timestamp)
    }
}

/// Rest in the book until matched or cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LimitOrderRepr")]
pub struct LimitOrderReq {
    pub volume: u64,
    pub participant_id: ParticipantId,
    pub price: Money,
    pub order_dir: OrderDir,
    pub timestamp: Timestamp,
}

impl LimitOrderReq {
    pub fn new(
        volume: u64,
        participant_id: ParticipantId,
        price: Money,
        order_dir: OrderDir,
        timestamp: Timestamp,
    ) -> Result<Self, OrderError> {
        if volume == 0 {
            return Err(OrderError::InvalidVolume);
        }
        if !price.is_positive() {
            return Err(OrderError::InvalidPrice);
        }
        Ok(Self { volume, participant_id, price, order_dir, timestamp })
    }

    /// Record stored in the book for this request
    pub fn to_resting(&self) -> RestingOrder {
        RestingOrder {
            volume: self.volume,
            participant_id: self.participant_id,
            timestamp: self.timestamp,
        }
    }
}

#[derive(Deserialize)]
struct LimitOrderRepr {
    volume: u64,
    participant_id: ParticipantId,
    price: Money,
    order_dir: OrderDir,
    timestamp: Timestamp,
}

impl TryFrom<LimitOrderRepr> for LimitOrderReq {
    type Error = OrderError;

    fn try_from(repr: LimitOrderRepr) -> Result<Self, Self::Error> {
        LimitOrderReq::new(repr.volume, repr.participant_id, repr.price, repr.order_dir, repr.timestamp)
    }
}

/// Remove one specific resting order
///
/// The target is identified by its side, price and original timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrderReq {
    pub participant_id: ParticipantId,
    pub order_dir: OrderDir,
    pub price: Money,
    pub order_timestamp: Timestamp,
    pub timestamp: Timestamp,
}

impl CancelOrderReq {
    /// Cancel the resting order created by `target`
    pub fn for_order(target: &LimitOrderReq, timestamp: Timestamp) -> Self {
        Self {
            participant_id: target.participant_id,
            order_dir: target.order_dir,
            price: target.price,
            order_timestamp: target.timestamp,
            timestamp,
        }
    }
}

/// Any request a participant may submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OrderRequest {
    Market(MarketOrderReq),
    Limit(LimitOrderReq),
    Cancel(CancelOrderReq),
}

impl OrderRequest {
    pub fn participant_id(&self) -> ParticipantId {
        match self {
            OrderRequest::Market(req) => req.participant_id,
            OrderRequest::Limit(req) => req.participant_id,
            OrderRequest::Cancel(req) => req.participant_id,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            OrderRequest::Market(req) => req.timestamp,
            OrderRequest::Limit(req) => req.timestamp,
            OrderRequest::Cancel(req) => req.timestamp,
        }
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            OrderRequest::Market(_) => "market",
            OrderRequest::Limit(_) => "limit",
            OrderRequest::Cancel(_) => "cancel",
        }
    }
}

impl From<MarketOrderReq> for OrderRequest {
    fn from(req: MarketOrderReq) -> Self {
        OrderRequest::Market(req)
    }
}

impl From<LimitOrderReq> for OrderRequest {
    fn from(req: LimitOrderReq) -> Self {
        OrderRequest::Limit(req)
    }
}

impl From<CancelOrderReq> for OrderRequest {
    fn from(req: CancelOrderReq) -> Self {
        OrderRequest::Cancel(req)
    }
}

/// A limit order resting in the book, keyed externally by price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrder {
    pub volume: u64,
    pub participant_id: ParticipantId,
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pid(n: u64) -> ParticipantId {
        ParticipantId::new(n)
    }

    #[test]
    fn test_contra() {
        assert_eq!(OrderDir::Bid.contra(), OrderDir::Ask);
        assert_eq!(OrderDir::Ask.contra(), OrderDir::Bid);
    }

    #[test]
    fn test_market_order_rejects_zero_volume() {
        let result = MarketOrderReq::new(0, pid(1), OrderDir::Bid, Timestamp::new(1));
        assert_eq!(result, Err(OrderError::InvalidVolume));
    }

    #[test]
    fn test_limit_order_validation() {
        let ts = Timestamp::new(1);
        assert_eq!(
            LimitOrderReq::new(0, pid(1), Money::money(100), OrderDir::Ask, ts),
            Err(OrderError::InvalidVolume)
        );
        assert_eq!(
            LimitOrderReq::new(5, pid(1), Money::money(0), OrderDir::Ask, ts),
            Err(OrderError::InvalidPrice)
        );
        assert!(LimitOrderReq::new(5, pid(1), Money::money(100), OrderDir::Ask, ts).is_ok());
    }

    #[test]
    fn test_to_resting_drops_direction() {
        let req = LimitOrderReq::new(5, pid(3), Money::money(9_800), OrderDir::Bid, Timestamp::new(9))
            .unwrap();
        let resting = req.to_resting();
        assert_eq!(resting.volume, 5);
        assert_eq!(resting.participant_id, pid(3));
        assert_eq!(resting.timestamp, Timestamp::new(9));
    }

    #[test]
    fn test_cancel_targets_original_order() {
        let req = LimitOrderReq::new(5, pid(3), Money::money(9_800), OrderDir::Bid, Timestamp::new(9))
            .unwrap();
        let cancel = CancelOrderReq::for_order(&req, Timestamp::new(12));
        assert_eq!(cancel.price, req.price);
        assert_eq!(cancel.order_timestamp, Timestamp::new(9));
        assert_eq!(cancel.timestamp, Timestamp::new(12));
    }

    #[test]
    fn test_request_accessors() {
        let req: OrderRequest =
            MarketOrderReq::new(2, pid(4), OrderDir::Ask, Timestamp::new(7)).unwrap().into();
        assert_eq!(req.participant_id(), pid(4));
        assert_eq!(req.timestamp(), Timestamp::new(7));
        assert_eq!(req.kind(), "market");
    }

    #[test]
    fn test_request_serialization_is_tagged() {
        let req: OrderRequest =
            MarketOrderReq::new(2, pid(4), OrderDir::Ask, Timestamp::new(7)).unwrap().into();
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"type\":\"Market\""));
        let back: OrderRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, req);
    }

    #[test]
    fn test_deserialization_validates_requests() {
        let limit = LimitOrderReq::new(5, pid(2), Money::money(10_100), OrderDir::Ask, Timestamp::new(3)).unwrap();
        let json = serde_json::to_string(&OrderRequest::from(limit)).unwrap();
        let back: OrderRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OrderRequest::Limit(limit));

        let zero_volume = json.replace("\"volume\":5", "\"volume\":0");
        assert!(serde_json::from_str::<OrderRequest>(&zero_volume).is_err());

        let zero_price = serde_json::to_string(&LimitOrderReq { price: Money::money(0), ..limit }).unwrap();
        assert!(serde_json::from_str::<LimitOrderReq>(&zero_price).is_err());

        let market = serde_json::to_string(&MarketOrderReq { volume: 0, participant_id: pid(1), order_dir: OrderDir::Bid, timestamp: Timestamp::new(4) })
            .unwrap();
        assert!(serde_json::from_str::<MarketOrderReq>(&market).is_err());
    }

    proptest! {
        #[test]
        fn prop_contra_is_involution(is_bid in any::<bool>()) {
            let dir = if is_bid { OrderDir::Bid } else { OrderDir::Ask };
            prop_assert_eq!(dir.contra().contra(), dir);
            prop_assert_ne!(dir.contra(), dir);
        }
    }
}
