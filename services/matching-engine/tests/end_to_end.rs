//! End-to-end exchange scenarios
//!
//! Drives the book, matching and settlement together through the public
//! exchange API.

use matching_engine::{Applied, Exchange, Idle, MatchingPolicy, MatchingSystem};
use types::errors::{BookError, ExchangeError, OrderError};
use types::ids::ParticipantId;
use types::numeric::Money;
use types::order::{CancelOrderReq, LimitOrderReq, MarketOrderReq, OrderDir, OrderRequest};

fn exchange(policy: MatchingPolicy) -> Exchange {
    Exchange::new(MatchingSystem::new(policy, 2024))
}

fn rest(ex: &mut Exchange, volume: u64, owner: ParticipantId, cents: i64, dir: OrderDir) -> LimitOrderReq {
    let ts = ex.stamp();
    let req = LimitOrderReq::new(volume, owner, Money::money(cents), dir, ts).unwrap();
    ex.apply(req.into()).unwrap();
    req
}

#[test]
fn test_two_quotes_then_market_bid() {
    let mut ex = exchange(MatchingPolicy::Fifo);
    let bidder = ex.add_participant(Money::money(100_000), 0, Box::new(Idle));
    let asker = ex.add_participant(Money::money(0), 5, Box::new(Idle));
    let submitter = ex.add_participant(Money::money(100_000), 0, Box::new(Idle));

    rest(&mut ex, 5, bidder, 9_800, OrderDir::Bid);
    rest(&mut ex, 5, asker, 10_200, OrderDir::Ask);

    assert_eq!(ex.book().mid_price(), Ok(Money::money(10_000)));
    assert_eq!(ex.book().abs_spread(), Ok(Money::money(400)));

    let ts = ex.stamp();
    let applied = ex
        .apply(MarketOrderReq::new(5, submitter, OrderDir::Bid, ts).unwrap().into())
        .unwrap();
    let Applied::Matched(fills) = applied else {
        panic!("market order should match");
    };

    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].bidder_id, submitter);
    assert_eq!(fills[0].asker_id, asker);
    assert_eq!(fills[0].volume, 5);
    assert_eq!(fills[0].price, Money::money(10_200));

    assert_eq!(ex.book().order_count(OrderDir::Ask), 0);
    assert_eq!(
        ex.book().best_price(OrderDir::Ask),
        Err(BookError::EmptySide { dir: OrderDir::Ask })
    );

    // The next tick cannot start until the ask side is reseeded
    assert_eq!(
        ex.tick().unwrap_err(),
        ExchangeError::Book(BookError::EmptySide { dir: OrderDir::Ask })
    );
}

#[test]
fn test_settlement_conserves_capital_and_shares() {
    for policy in [MatchingPolicy::Fifo, MatchingPolicy::ProRata, MatchingPolicy::RandomSelection] {
        let mut ex = exchange(policy);
        let makers: Vec<_> = (0..4)
            .map(|_| ex.add_participant(Money::money(50_000), 100, Box::new(Idle)))
            .collect();
        let taker = ex.add_participant(Money::money(1_000_000), 0, Box::new(Idle));

        for (i, maker) in makers.iter().enumerate() {
            rest(&mut ex, 10 + i as u64, *maker, 10_100 + i as i64 % 2, OrderDir::Ask);
            rest(&mut ex, 10, *maker, 9_900, OrderDir::Bid);
        }
        let before = ex.snapshot().unwrap();

        let ts = ex.stamp();
        ex.apply(MarketOrderReq::new(30, taker, OrderDir::Bid, ts).unwrap().into())
            .unwrap();
        let ts = ex.stamp();
        ex.apply(MarketOrderReq::new(15, taker, OrderDir::Ask, ts).unwrap().into())
            .unwrap();

        let after = ex.snapshot().unwrap();
        assert_eq!(before.total_capital(), after.total_capital(), "policy {policy}");
        assert_eq!(before.total_shares(), after.total_shares(), "policy {policy}");
        assert_eq!(ex.account(taker).unwrap().shares, 15, "policy {policy}");
    }
}

#[test]
fn test_settlement_amounts_are_exact() {
    let mut ex = exchange(MatchingPolicy::Fifo);
    let asker = ex.add_participant(Money::money(1_000), 50, Box::new(Idle));
    let bidder = ex.add_participant(Money::money(100_000), 0, Box::new(Idle));

    rest(&mut ex, 7, asker, 3_333, OrderDir::Ask);

    let ts = ex.stamp();
    ex.apply(MarketOrderReq::new(7, bidder, OrderDir::Bid, ts).unwrap().into())
        .unwrap();

    // 7 × 33.33 = 233.31
    let bidder_account = ex.account(bidder).unwrap();
    assert_eq!(bidder_account.capital, Money::money(100_000 - 23_331));
    assert_eq!(bidder_account.shares, 7);
    let asker_account = ex.account(asker).unwrap();
    assert_eq!(asker_account.capital, Money::money(1_000 + 23_331));
    assert_eq!(asker_account.shares, 43);
}

#[test]
fn test_cancel_after_fill_is_a_miss() {
    let mut ex = exchange(MatchingPolicy::Fifo);
    let maker = ex.add_participant(Money::money(0), 10, Box::new(Idle));
    let taker = ex.add_participant(Money::money(100_000), 0, Box::new(Idle));

    let quote = rest(&mut ex, 3, maker, 10_000, OrderDir::Ask);
    rest(&mut ex, 3, maker, 10_100, OrderDir::Ask);

    let ts = ex.stamp();
    ex.apply(MarketOrderReq::new(3, taker, OrderDir::Bid, ts).unwrap().into())
        .unwrap();

    let ts = ex.stamp();
    let applied = ex.apply(CancelOrderReq::for_order(&quote, ts).into()).unwrap();
    assert_eq!(applied, Applied::Cancelled { removed: false });
    assert_eq!(ex.book().order_count(OrderDir::Ask), 1);
}

#[test]
fn test_remove_earliest_restores_count() {
    let mut ex = exchange(MatchingPolicy::Fifo);
    let owner = ex.add_participant(Money::money(0), 0, Box::new(Idle));
    rest(&mut ex, 1, owner, 9_000, OrderDir::Bid);
    let other = ex.add_participant(Money::money(0), 0, Box::new(Idle));

    let mut book = ex.book().clone();
    let before = book.order_count(OrderDir::Bid);
    let ts = ex.stamp();
    book.insert(&LimitOrderReq::new(4, other, Money::money(9_100), OrderDir::Bid, ts).unwrap()).unwrap();
    assert_eq!(book.order_count(OrderDir::Bid), before + 1);

    assert!(book.remove_earliest_by_participant(other, OrderDir::Bid));
    assert_eq!(book.order_count(OrderDir::Bid), before);
    assert!(!book.remove_earliest_by_participant(other, OrderDir::Bid));
}

#[test]
fn test_zero_volume_limits_never_reach_matching() {
    for policy in [MatchingPolicy::Fifo, MatchingPolicy::ProRata, MatchingPolicy::RandomSelection] {
        let mut ex = exchange(policy);
        let maker = ex.add_participant(Money::money(0), 20, Box::new(Idle));
        let taker = ex.add_participant(Money::money(1_000_000), 0, Box::new(Idle));
        rest(&mut ex, 10, maker, 10_000, OrderDir::Ask);

        // Neither the wire form nor a hand-built request can rest an empty record
        let ts = ex.stamp();
        let valid: OrderRequest = LimitOrderReq::new(1, maker, Money::money(10_000), OrderDir::Ask, ts)
            .unwrap()
            .into();
        let json = serde_json::to_string(&valid).unwrap().replace("\"volume\":1", "\"volume\":0");
        assert!(serde_json::from_str::<OrderRequest>(&json).is_err());

        let OrderRequest::Limit(valid) = valid else { unreachable!() };
        let empty = LimitOrderReq { volume: 0, price: Money::money(10_100), ..valid };
        assert_eq!(
            ex.apply(empty.into()),
            Err(ExchangeError::Order(OrderError::InvalidVolume))
        );
        rest(&mut ex, 10, maker, 10_100, OrderDir::Ask);

        let ts = ex.stamp();
        let applied = ex
            .apply(MarketOrderReq::new(15, taker, OrderDir::Bid, ts).unwrap().into())
            .unwrap();
        let Applied::Matched(fills) = applied else {
            panic!("market order should match");
        };
        assert_eq!(fills.iter().map(|f| f.volume).sum::<u64>(), 15, "{policy}");
        assert_eq!(ex.book().total_volume(OrderDir::Ask), 5, "{policy}");
        assert_eq!(ex.account(taker).unwrap().shares, 15);
    }
}
