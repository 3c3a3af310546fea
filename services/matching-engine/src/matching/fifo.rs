//! Price-time priority
//!
//! Repeatedly fill against the earliest record at the best contra price.
//! Each fill takes as much as both sides allow, so a record larger than the
//! remainder is reduced in place and keeps its priority.

use types::errors::MatchError;
use types::order::MarketOrderReq;
use types::trade::TransactionRequest;

use super::executor::MatchExecutor;
use crate::book::OrderBook;

pub fn match_fifo(
    executor: &mut MatchExecutor,
    req: &MarketOrderReq,
    book: &mut OrderBook,
) -> Result<Vec<TransactionRequest>, MatchError> {
    let contra = req.order_dir.contra();
    let mut remaining = req.volume;
    let mut transactions = Vec::new();

    while remaining > 0 {
        let (handle, resting) = book.earliest_at_best_price(contra)?;
        let volume = remaining.min(resting.volume);
        transactions.push(executor.execute_fill(book, req, &handle, volume)?);
        remaining -= volume;
    }

    Ok(transactions)
}
