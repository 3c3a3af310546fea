//! Types library for the exchange simulator
//!
//! Core type definitions shared by the matching engine and the simulation:
//! exact fixed-point money, identifiers, order requests, transactions,
//! participant accounts and the error taxonomy.
//!
//! # Modules
//! - `ids`: Participant ids and the logical request clock
//! - `numeric`: Fixed-point decimal type (`Fixed`, `Money`)
//! - `order`: Order directions, requests and resting records
//! - `trade`: Transaction requests produced by matching
//! - `account`: Participant capital and shares
//! - `errors`: Error taxonomy

pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod account;
pub mod errors;

pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
    pub use crate::account::*;
    pub use crate::errors::*;
}
