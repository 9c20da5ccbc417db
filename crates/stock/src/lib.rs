//! Stock ledger for the fulfillment system.
//!
//! Holds, per product, a total `quantity` and a `reserved` counter and
//! guards the invariant `0 <= reserved <= quantity` through atomic
//! reserve/release/adjust operations. Two stock-control disciplines are
//! exposed:
//!
//! 1. reserve/release against the `reserved` counter (inventory path)
//! 2. direct `quantity` adjustment (order path)
//!
//! Mixing both disciplines on the same product is out of contract; see
//! [`StockLedger`] for details.

pub mod error;
pub mod ledger;
pub mod record;

pub use error::StockError;
pub use ledger::StockLedger;
pub use record::{LowStockItem, StockRecord, StockSnapshot};
