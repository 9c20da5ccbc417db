//! Shipment status lifecycle.

use serde::{Deserialize, Serialize};

/// The status of a shipment.
///
/// Matching the order component's permissiveness, `update_status`
/// accepts any of the six statuses at any time; only cancellation is
/// guarded (allowed from `pending`/`preparing` only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    /// Shipment created, not yet picked.
    #[default]
    Pending,

    /// Being packed at the warehouse.
    Preparing,

    /// Handed to the carrier.
    InTransit,

    /// On the last-mile vehicle.
    OutForDelivery,

    /// Delivered to the recipient.
    Delivered,

    /// Cancelled before leaving the warehouse.
    Cancelled,
}

impl ShipmentStatus {
    /// Returns true if the shipment can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        matches!(self, ShipmentStatus::Pending | ShipmentStatus::Preparing)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::Preparing => "preparing",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::OutForDelivery => "out_for_delivery",
            ShipmentStatus::Delivered => "delivered",
            ShipmentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ShipmentStatus {
    type Err = crate::error::ShippingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ShipmentStatus::Pending),
            "preparing" => Ok(ShipmentStatus::Preparing),
            "in_transit" => Ok(ShipmentStatus::InTransit),
            "out_for_delivery" => Ok(ShipmentStatus::OutForDelivery),
            "delivered" => Ok(ShipmentStatus::Delivered),
            "cancelled" => Ok(ShipmentStatus::Cancelled),
            other => Err(crate::error::ShippingError::InvalidStatus(other.to_string())),
        }
    }
}
