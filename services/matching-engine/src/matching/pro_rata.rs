//! Pro-rata allocation
//!
//! At the best contra level each record receives `floor(remaining × volume /
//! level_volume)`. The units lost to flooring go one at a time to the
//! earliest records that still have room. A level too small for the
//! remainder is consumed whole and allocation continues at the next price.

use types::errors::MatchError;
use types::order::MarketOrderReq;
use types::trade::TransactionRequest;

use super::executor::MatchExecutor;
use crate::book::OrderBook;

pub fn match_pro_rata(
    executor: &mut MatchExecutor,
    req: &MarketOrderReq,
    book: &mut OrderBook,
) -> Result<Vec<TransactionRequest>, MatchError> {
    let contra = req.order_dir.contra();
    let mut remaining = req.volume;
    let mut transactions = Vec::new();

    while remaining > 0 {
        let mut level = book.orders_at_best_price(contra)?;
        level.sort_by_key(|(_, resting)| resting.timestamp);
        let level_volume: u64 = level.iter().map(|(_, resting)| resting.volume).sum();

        let allocations: Vec<u64> = if remaining >= level_volume {
            level.iter().map(|(_, resting)| resting.volume).collect()
        } else {
            allocate(remaining, level_volume, &level.iter().map(|(_, r)| r.volume).collect::<Vec<_>>())
        };

        for ((handle, _), volume) in level.iter().zip(allocations) {
            if volume == 0 {
                continue;
            }
            transactions.push(executor.execute_fill(book, req, handle, volume)?);
            remaining -= volume;
        }
    }

    Ok(transactions)
}

/// Split `target` across `volumes` proportionally
///
/// Requires `target < level_volume`, which guarantees each record can absorb
/// one extra unit on top of its floor share.
fn allocate(target: u64, level_volume: u64, volumes: &[u64]) -> Vec<u64> {
    let mut shares: Vec<u64> = volumes
        .iter()
        .map(|&volume| (target as u128 * volume as u128 / level_volume as u128) as u64)
        .collect();

    let mut leftover = target - shares.iter().sum::<u64>();
    for (share, &volume) in shares.iter_mut().zip(volumes) {
        if leftover == 0 {
            break;
        }
        if *share < volume {
            *share += 1;
            leftover -= 1;
        }
    }
    debug_assert_eq!(leftover, 0);

    shares
}
