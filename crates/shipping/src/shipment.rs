//! Shipment records, history entries, and tracking views.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};

use crate::status::ShipmentStatus;

/// One entry in a shipment's append-only history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub status: ShipmentStatus,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub note: String,
}

/// A shipment and its audit trail.
///
/// Every status change appends exactly one history entry in the same
/// operation; history length strictly increases over the shipment's
/// lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub shipment_id: String,
    pub order_id: OrderId,
    pub recipient: String,
    pub address: String,
    pub items: Vec<String>,
    pub carrier: String,
    pub tracking_number: String,
    pub status: ShipmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub estimated_delivery: DateTime<Utc>,
    pub history: Vec<HistoryEntry>,
}

/// Tracking subset of a shipment returned by the track endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingView {
    pub shipment_id: String,
    pub tracking_number: String,
    pub carrier: String,
    pub status: ShipmentStatus,
    pub estimated_delivery: DateTime<Utc>,
    pub history: Vec<HistoryEntry>,
}

impl From<&Shipment> for TrackingView {
    fn from(shipment: &Shipment) -> Self {
        Self {
            shipment_id: shipment.shipment_id.clone(),
            tracking_number: shipment.tracking_number.clone(),
            carrier: shipment.carrier.clone(),
            status: shipment.status,
            estimated_delivery: shipment.estimated_delivery,
            history: shipment.history.clone(),
        }
    }
}
