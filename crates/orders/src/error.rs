//! Order orchestration error types.

use common::{OrderId, ProductId};
use thiserror::Error;

use crate::status::OrderStatus;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Order does not exist.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The referenced product does not exist upstream.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Not enough sellable stock to create the order.
    #[error("Insufficient stock: {requested} requested, {available} available")]
    InsufficientStock { available: u32, requested: u32 },

    /// Cancellation is not allowed from the order's current status.
    #[error("Cannot cancel order in {status} status")]
    CannotCancel { status: OrderStatus },

    /// The status string is not one of the five known values.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// A dependent service is unreachable or timed out.
    #[error("Upstream unavailable: {0}")]
    Upstream(String),
}

/// Convenience type alias for order results.
pub type Result<T> = std::result::Result<T, OrderError>;
