//! Exchange tick loop
//!
//! Owns the book, the matching system, every participant and the id and
//! timestamp counters. One tick:
//!
//! 1. refresh the book state,
//! 2. ask every participant, in a fixed order, for requests,
//! 3. apply the queued requests in submission order, settling each market
//!    order's transactions as soon as it is matched,
//! 4. clear the queue.
//!
//! Any error aborts the tick and is returned to the caller; the run is over
//! at that point.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, info};
use types::account::Account;
use types::errors::{ExchangeError, SettlementError};
use types::ids::{IdIssuer, LogicalClock, ParticipantId, Timestamp};
use types::numeric::Money;
use types::order::{LimitOrderReq, OrderDir, OrderRequest};
use types::trade::TransactionRequest;

use crate::book::{BookState, OrderBook, OrderHandle};
use crate::matching::MatchingSystem;
use crate::saturation::{self, SaturationConfig};
use crate::snapshot::ExchangeSnapshot;

/// Decision context handed to a strategy once per tick
pub struct DecisionContext<'a> {
    pub participant_id: ParticipantId,
    pub account: &'a Account,
    pub state: &'a BookState,
    clock: &'a mut LogicalClock,
}

impl DecisionContext<'_> {
    /// Timestamp for the next request this participant builds
    pub fn stamp(&mut self) -> Timestamp {
        self.clock.stamp()
    }
}

/// Decision logic of a participant
pub trait Strategy {
    /// Short label used in logs and exports
    fn name(&self) -> &'static str;

    /// Requests to submit this tick, in submission order
    fn decide(&mut self, ctx: &mut DecisionContext<'_>) -> Vec<OrderRequest>;
}

/// A participant that never trades
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl Strategy for Idle {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn decide(&mut self, _ctx: &mut DecisionContext<'_>) -> Vec<OrderRequest> {
        Vec::new()
    }
}

pub struct Participant {
    pub account: Account,
    strategy: Box<dyn Strategy>,
}

impl Participant {
    pub fn id(&self) -> ParticipantId {
        self.account.id
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
}

/// Outcome of applying a single request
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Rested(OrderHandle),
    Cancelled { removed: bool },
    Matched(Vec<TransactionRequest>),
}

/// Counters for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub limits: usize,
    pub markets: usize,
    pub cancels: usize,
    pub cancel_misses: usize,
    pub transactions: Vec<TransactionRequest>,
}

impl TickReport {
    pub fn requests(&self) -> usize {
        self.limits + self.markets + self.cancels
    }

    pub fn traded_volume(&self) -> u64 {
        types::trade::total_volume(&self.transactions)
    }
}

pub struct Exchange<R = rand_chacha::ChaCha8Rng> {
    book: OrderBook,
    matching: MatchingSystem<R>,
    participants: Vec<Participant>,
    index: HashMap<ParticipantId, usize>,
    ids: IdIssuer,
    clock: LogicalClock,
    queue: Vec<OrderRequest>,
    ticks: u64,
}

impl<R: Rng> Exchange<R> {
    pub fn new(matching: MatchingSystem<R>) -> Self {
        Self {
            book: OrderBook::new(),
            matching,
            participants: Vec::new(),
            index: HashMap::new(),
            ids: IdIssuer::new(),
            clock: LogicalClock::new(),
            queue: Vec::new(),
            ticks: 0,
        }
    }

    /// Register a participant; it is polled after every earlier one
    pub fn add_participant(&mut self, capital: Money, shares: i64, strategy: Box<dyn Strategy>) -> ParticipantId {
        let id = self.ids.issue();
        self.index.insert(id, self.participants.len());
        self.participants.push(Participant {
            account: Account::new(id, capital, shares),
            strategy,
        });
        id
    }

    /// Permute the polling order once; ids are unaffected
    pub fn shuffle_participants<G: Rng + ?Sized>(&mut self, rng: &mut G) {
        self.participants.shuffle(rng);
        self.index = self
            .participants
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id(), i))
            .collect();
    }

    /// Seed both sides of the book with orders owned by `seeder`
    pub fn saturate<G: Rng + ?Sized>(
        &mut self,
        seeder: ParticipantId,
        config: &SaturationConfig,
        rng: &mut G,
    ) -> Result<(), ExchangeError> {
        config.validate()?;
        if !self.index.contains_key(&seeder) {
            return Err(SettlementError::UnknownParticipant { id: seeder }.into());
        }
        let bid_range = config.bid_range()?;
        let ask_range = config.ask_range()?;

        for _ in 0..config.orders_per_side {
            for (dir, range) in [(OrderDir::Bid, bid_range), (OrderDir::Ask, ask_range)] {
                let req = LimitOrderReq::new(
                    config.draw_volume(rng),
                    seeder,
                    saturation::draw_price(rng, range),
                    dir,
                    self.clock.stamp(),
                )?;
                self.book.insert(&req)?;
            }
        }
        let state = self.book.refresh_state()?;

        info!(
            orders_per_side = config.orders_per_side,
            best_bid = %state.best_bid,
            best_ask = %state.best_ask,
            "Book saturated"
        );
        Ok(())
    }

    /// Run one tick
    pub fn tick(&mut self) -> Result<TickReport, ExchangeError> {
        let state = *self.book.refresh_state()?;
        self.ticks += 1;

        for participant in &mut self.participants {
            let mut ctx = DecisionContext {
                participant_id: participant.account.id,
                account: &participant.account,
                state: &state,
                clock: &mut self.clock,
            };
            let requests = participant.strategy.decide(&mut ctx);
            self.queue.extend(requests);
        }

        let mut report = TickReport {
            tick: self.ticks,
            ..Default::default()
        };
        let queue = std::mem::take(&mut self.queue);
        for request in queue {
            match self.apply(request)? {
                Applied::Rested(_) => report.limits += 1,
                Applied::Cancelled { removed } => {
                    report.cancels += 1;
                    if !removed {
                        report.cancel_misses += 1;
                    }
                }
                Applied::Matched(transactions) => {
                    report.markets += 1;
                    report.transactions.extend(transactions);
                }
            }
        }

        info!(
            tick = report.tick,
            requests = report.requests(),
            fills = report.transactions.len(),
            traded_volume = report.traded_volume(),
            "Tick complete"
        );
        Ok(report)
    }

    /// Apply one request to the book, settling any resulting transactions
    pub fn apply(&mut self, request: OrderRequest) -> Result<Applied, ExchangeError> {
        debug!(
            kind = request.kind(),
            participant = %request.participant_id(),
            timestamp = %request.timestamp(),
            "Applying request"
        );
        match request {
            OrderRequest::Limit(req) => Ok(Applied::Rested(self.book.insert(&req)?)),
            OrderRequest::Cancel(req) => Ok(Applied::Cancelled {
                removed: self.book.cancel(&req),
            }),
            OrderRequest::Market(req) => {
                let transactions = self.matching.execute(&req, &mut self.book)?;
                for transaction in &transactions {
                    self.settle(transaction)?;
                }
                Ok(Applied::Matched(transactions))
            }
        }
    }

    /// Move shares from asker to bidder and capital the other way
    pub fn settle(&mut self, transaction: &TransactionRequest) -> Result<(), SettlementError> {
        let bidder = self.position(transaction.bidder_id)?;
        let asker = self.position(transaction.asker_id)?;
        let total = transaction.total_price()?;

        // Both legs are computed before either account is written
        let mut seller = self.participants[asker].account;
        seller.sell(transaction.volume, total)?;
        let mut buyer = if bidder == asker { seller } else { self.participants[bidder].account };
        buyer.buy(transaction.volume, total)?;

        self.participants[asker].account = seller;
        self.participants[bidder].account = buyer;
        Ok(())
    }

    fn position(&self, id: ParticipantId) -> Result<usize, SettlementError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(SettlementError::UnknownParticipant { id })
    }

    pub fn account(&self, id: ParticipantId) -> Option<&Account> {
        self.index.get(&id).map(|&i| &self.participants[i].account)
    }

    /// Participants in polling order
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn matching(&self) -> &MatchingSystem<R> {
        &self.matching
    }

    /// Timestamp for a request submitted from outside the tick loop
    pub fn stamp(&mut self) -> Timestamp {
        self.clock.stamp()
    }

    /// Ticks completed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Serializable view of the book and every account
    pub fn snapshot(&self) -> Result<ExchangeSnapshot, ExchangeError> {
        ExchangeSnapshot::capture(self.ticks, &self.book, &self.participants)
    }
}
