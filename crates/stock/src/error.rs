//! Stock ledger error types.

use common::ProductId;
use thiserror::Error;

/// Errors that can occur during stock ledger operations.
#[derive(Debug, Error)]
pub enum StockError {
    /// Product is not in the ledger.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// A product with this ID already exists.
    #[error("Product already exists: {0}")]
    AlreadyExists(ProductId),

    /// The operation would allocate more units than are available.
    #[error("Insufficient stock: {requested} requested, {available} available")]
    InsufficientStock { available: u32, requested: u32 },

    /// The operation would release more units than are reserved.
    #[error("Cannot release more than reserved: {requested} requested, {reserved} reserved")]
    OverRelease { reserved: u32, requested: u32 },

    /// Total quantity cannot be set below the reserved amount.
    #[error("Cannot set quantity below reserved amount: {reserved} reserved")]
    QuantityBelowReserved { reserved: u32 },

    /// The adjustment would push quantity past the counter's capacity.
    #[error("Adjustment delta out of range: {delta}")]
    QuantityOverflow { delta: i64 },
}

/// Convenience type alias for stock results.
pub type Result<T> = std::result::Result<T, StockError>;
