//! Error types for the exchange
//!
//! Error taxonomy using thiserror. Contract, precondition, liquidity and
//! lookup violations are errors; a cancel that finds nothing is not.

use crate::ids::ParticipantId;
use crate::order::OrderDir;
use thiserror::Error;

/// Top-level exchange error, surfaced to the tick driver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    #[error("Numeric error: {0}")]
    Numeric(#[from] NumericError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Book error: {0}")]
    Book(#[from] BookError),

    #[error("Match error: {0}")]
    Match(#[from] MatchError),

    #[error("Settlement error: {0}")]
    Settlement(#[from] SettlementError),

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Fixed-point arithmetic errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    #[error("Scale exponent {scale} outside [-{max}, {max}]")]
    InvalidScale { scale: i32, max: i32 },

    #[error("Fixed-point overflow")]
    Overflow,

    #[error("Division by zero")]
    DivisionByZero,
}

/// Order request contract violations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderError {
    #[error("Order volume must be positive")]
    InvalidVolume,

    #[error("Limit price must be positive")]
    InvalidPrice,
}

/// Order book precondition violations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookError {
    #[error("Book not ready: no resting orders on the {dir} side")]
    EmptySide { dir: OrderDir },

    #[error("Book state has not been computed yet")]
    StateNotComputed,

    #[error("Numeric error while deriving book state: {0}")]
    Numeric(#[from] NumericError),
}

/// Matching failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchError {
    #[error("Market order volume must be positive")]
    InvalidVolume,

    #[error("Insufficient {dir} liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity {
        dir: OrderDir,
        requested: u64,
        available: u64,
    },

    #[error("Stale order handle")]
    StaleHandle,

    #[error("Book error: {0}")]
    Book(#[from] BookError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] NumericError),
}

/// Settlement failures. Always fatal for the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettlementError {
    #[error("Participant not found: {id}")]
    UnknownParticipant { id: ParticipantId },

    #[error("Numeric error while settling: {0}")]
    Numeric(#[from] NumericError),
}
