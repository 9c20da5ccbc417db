//! Payment status machine.

use serde::{Deserialize, Serialize};

/// The status of a payment in its lifecycle.
///
/// Status transitions:
/// ```text
/// pending ──┬──► completed ──► refunded
///           └──► failed
/// ```
/// All other transitions are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment created, gateway not yet consulted.
    #[default]
    Pending,

    /// Gateway approved the charge (refundable).
    Completed,

    /// Gateway declined the charge (terminal state).
    Failed,

    /// A completed payment was refunded (terminal state).
    Refunded,
}

impl PaymentStatus {
    /// Returns true if the payment can be processed from this status.
    pub fn can_process(&self) -> bool {
        matches!(self, PaymentStatus::Pending)
    }

    /// Returns true if the payment can be refunded from this status.
    pub fn can_refund(&self) -> bool {
        matches!(self, PaymentStatus::Completed)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_can_process() {
        assert!(PaymentStatus::Pending.can_process());
        assert!(!PaymentStatus::Completed.can_process());
        assert!(!PaymentStatus::Failed.can_process());
        assert!(!PaymentStatus::Refunded.can_process());
    }

    #[test]
    fn only_completed_can_refund() {
        assert!(!PaymentStatus::Pending.can_refund());
        assert!(PaymentStatus::Completed.can_refund());
        assert!(!PaymentStatus::Failed.can_refund());
        assert!(!PaymentStatus::Refunded.can_refund());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&PaymentStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
