//! Order status lifecycle.

use serde::{Deserialize, Serialize};

/// The status of an order.
///
/// Only `cancel` is guarded (not allowed once shipped or delivered).
/// General status updates are deliberately unguarded: advancement is
/// driven by external shipment events, so any status may overwrite any
/// other through [`crate::OrderOrchestrator::update_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order created, stock commitment attempted.
    #[default]
    Pending,

    /// Payment completed for the order.
    Confirmed,

    /// Order handed to a carrier.
    Shipped,

    /// Order received by the customer.
    Delivered,

    /// Order cancelled; committed stock is restored best-effort.
    Cancelled,
}

impl OrderStatus {
    /// Returns true if the order can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        !matches!(self, OrderStatus::Shipped | OrderStatus::Delivered)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = crate::error::OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(crate::error::OrderError::InvalidStatus(other.to_string())),
        }
    }
}
