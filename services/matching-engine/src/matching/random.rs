//! Random selection
//!
//! Draw records at the best contra level uniformly without replacement and
//! fill each as far as the remainder allows. Moves to the next price once a
//! level is exhausted. The draw order depends only on the rng and the level's
//! insertion order, so a seeded rng reproduces a run exactly.

use rand::Rng;
use types::errors::MatchError;
use types::order::MarketOrderReq;
use types::trade::TransactionRequest;

use super::executor::MatchExecutor;
use crate::book::OrderBook;

pub fn match_random<R: Rng + ?Sized>(
    executor: &mut MatchExecutor,
    req: &MarketOrderReq,
    book: &mut OrderBook,
    rng: &mut R,
) -> Result<Vec<TransactionRequest>, MatchError> {
    let contra = req.order_dir.contra();
    let mut remaining = req.volume;
    let mut transactions = Vec::new();

    while remaining > 0 {
        let mut level = book.orders_at_best_price(contra)?;
        while remaining > 0 && !level.is_empty() {
            let pick = rng.gen_range(0..level.len());
            let (handle, resting) = level.swap_remove(pick);
            let volume = remaining.min(resting.volume);
            transactions.push(executor.execute_fill(book, req, &handle, volume)?);
            remaining -= volume;
        }
    }

    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;
    use types::ids::{ParticipantId, Timestamp};
    use types::numeric::Money;
    use types::order::{LimitOrderReq, OrderDir};
    use types::trade::total_volume;

    fn book_with_asks(volumes: &[u64]) -> OrderBook {
        let mut book = OrderBook::new();
        for (i, &volume) in volumes.iter().enumerate() {
            let n = i as u64 + 1;
            book.insert(
                &LimitOrderReq::new(volume, ParticipantId::new(n), Money::money(10_000), OrderDir::Ask, Timestamp::new(n))
                    .unwrap(),
            ).unwrap();
        }
        book
    }

    fn buy(volume: u64) -> MarketOrderReq {
        MarketOrderReq::new(volume, ParticipantId::new(99), OrderDir::Bid, Timestamp::new(100)).unwrap()
    }

    #[test]
    fn test_random_fills_requested_volume() {
        let mut book = book_with_asks(&[20, 30, 50]);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut executor = MatchExecutor::new();

        let fills = match_random(&mut executor, &buy(40), &mut book, &mut rng).unwrap();

        assert_eq!(total_volume(&fills), 40);
        assert_eq!(book.total_volume(OrderDir::Ask), 60);
        // Each record is drawn at most once
        let providers: HashSet<_> = fills.iter().map(|t| t.asker_id).collect();
        assert_eq!(providers.len(), fills.len());
    }

    #[test]
    fn test_random_is_reproducible_with_same_seed() {
        let run = |seed| {
            let mut book = book_with_asks(&[5, 5, 5, 5, 5, 5]);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut executor = MatchExecutor::new();
            match_random(&mut executor, &buy(12), &mut book, &mut rng).unwrap()
        };

        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_random_takes_whole_level_before_moving_on() {
        let mut book = book_with_asks(&[3, 4]);
        book.insert(
            &LimitOrderReq::new(10, ParticipantId::new(9), Money::money(10_100), OrderDir::Ask, Timestamp::new(9))
                .unwrap(),
        ).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut executor = MatchExecutor::new();

        let fills = match_random(&mut executor, &buy(9), &mut book, &mut rng).unwrap();

        assert_eq!(fills.len(), 3);
        assert_eq!(fills[2].price, Money::money(10_100));
        assert_eq!(fills[2].volume, 2);
    }
}
