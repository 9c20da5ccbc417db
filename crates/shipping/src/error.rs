//! Shipping error types.

use thiserror::Error;

use crate::status::ShipmentStatus;

/// Errors that can occur during shipping operations.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// Shipment does not exist.
    #[error("Shipment not found: {0}")]
    NotFound(String),

    /// Shipment has progressed past the cancellable statuses.
    #[error("Cannot cancel shipment: shipment is already {status}")]
    CannotCancel { status: ShipmentStatus },

    /// The status string is not one of the six known values.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// A required field is missing or empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Estimation weight must be positive.
    #[error("Invalid weight: {0}")]
    InvalidWeight(f64),
}

/// Convenience type alias for shipping results.
pub type Result<T> = std::result::Result<T, ShippingError>;
