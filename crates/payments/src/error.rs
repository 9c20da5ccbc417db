//! Payment error types.

use thiserror::Error;

use crate::status::PaymentStatus;

/// Errors that can occur during payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Payment is not known to the processor.
    #[error("Payment not found: {0}")]
    NotFound(String),

    /// The status machine forbids the requested action.
    #[error("Cannot {action} payment in {status} status")]
    InvalidTransition {
        action: &'static str,
        status: PaymentStatus,
    },
}

/// Convenience type alias for payment results.
pub type Result<T> = std::result::Result<T, PaymentError>;
