//! Order book infrastructure module
//!
//! Contains price levels, the two book sides, the book itself and its
//! derived state.

pub mod price_level;
pub mod side;
pub mod order_book;
pub mod state;

pub use price_level::{PriceLevel, SlotRef};
pub use side::{BookSide, LevelDepth, OrderHandle};
pub use order_book::OrderBook;
pub use state::BookState;
