//! The shipment status tracker.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{Duration, Utc};
use common::OrderId;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{Result, ShippingError};
use crate::estimate::{CarrierEstimate, estimate_with};
use crate::shipment::{HistoryEntry, Shipment, TrackingView};
use crate::status::ShipmentStatus;

/// Carriers a shipment may be assigned to.
pub const CARRIERS: [&str; 5] = [
    "DHL Express",
    "FedEx International",
    "UPS Worldwide",
    "USPS Priority",
    "Local Courier",
];

#[derive(Debug, Default)]
struct TrackerInner {
    shipments: HashMap<String, Shipment>,
    next_id: u64,
}

/// Tracks shipments through their status lifecycle with an append-only
/// history per shipment.
///
/// Not on the order path's critical consistency chain: the tracker is
/// only invoked after an order is confirmed.
#[derive(Debug, Clone)]
pub struct ShipmentTracker {
    inner: Arc<RwLock<TrackerInner>>,
    rng: Arc<Mutex<StdRng>>,
}

impl ShipmentTracker {
    /// Creates a tracker seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a tracker with a fixed seed, for deterministic carrier
    /// assignment and estimates in tests.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            inner: Arc::new(RwLock::new(TrackerInner::default())),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Creates a shipment: random carrier, derived tracking number, and
    /// an ETA 3 to 7 days out.
    #[tracing::instrument(skip(self, items))]
    pub fn create(
        &self,
        order_id: OrderId,
        recipient: impl Into<String> + std::fmt::Debug,
        address: impl Into<String> + std::fmt::Debug,
        items: Vec<String>,
    ) -> Result<Shipment> {
        let recipient = recipient.into();
        let address = address.into();
        if recipient.trim().is_empty() {
            return Err(ShippingError::MissingField("recipient"));
        }
        if address.trim().is_empty() {
            return Err(ShippingError::MissingField("address"));
        }

        let (carrier, tracking_number, transit_days) = {
            let mut rng = self.rng.lock().unwrap();
            let carrier = *CARRIERS.choose(&mut *rng).unwrap();
            let tracking_number = format!(
                "{}{}",
                carrier[..3].to_uppercase(),
                rng.gen_range(1_000_000..=9_999_999u32)
            );
            (carrier, tracking_number, rng.gen_range(3..=7i64))
        };

        let mut inner = self.inner.write().unwrap();
        inner.next_id += 1;
        let shipment_id = format!("SHIP-{:06}", inner.next_id);
        let now = Utc::now();

        let shipment = Shipment {
            shipment_id: shipment_id.clone(),
            order_id,
            recipient,
            address,
            items,
            carrier: carrier.to_string(),
            tracking_number,
            status: ShipmentStatus::Pending,
            created_at: now,
            updated_at: now,
            estimated_delivery: now + Duration::days(transit_days),
            history: vec![HistoryEntry {
                status: ShipmentStatus::Pending,
                timestamp: now,
                location: "Warehouse".to_string(),
                note: "Shipment created".to_string(),
            }],
        };

        inner.shipments.insert(shipment_id.clone(), shipment.clone());
        metrics::counter!("shipments_created_total").increment(1);
        tracing::info!(shipment_id, %order_id, carrier, "shipment created");
        Ok(shipment)
    }

    /// Returns a shipment by ID.
    pub fn get(&self, shipment_id: &str) -> Result<Shipment> {
        self.inner
            .read()
            .unwrap()
            .shipments
            .get(shipment_id)
            .cloned()
            .ok_or_else(|| ShippingError::NotFound(shipment_id.to_string()))
    }

    /// Returns the tracking view for a shipment.
    pub fn track(&self, shipment_id: &str) -> Result<TrackingView> {
        self.get(shipment_id).map(|s| TrackingView::from(&s))
    }

    /// Returns shipments, optionally filtered by status and/or order.
    pub fn list(
        &self,
        status: Option<ShipmentStatus>,
        order_id: Option<OrderId>,
    ) -> Vec<Shipment> {
        let inner = self.inner.read().unwrap();
        let mut shipments: Vec<Shipment> = inner
            .shipments
            .values()
            .filter(|s| status.is_none_or(|want| s.status == want))
            .filter(|s| order_id.is_none_or(|want| s.order_id == want))
            .cloned()
            .collect();
        shipments.sort_by(|a, b| a.shipment_id.cmp(&b.shipment_id));
        shipments
    }

    /// Sets a shipment's status and appends one history entry.
    ///
    /// No transition table: any of the six statuses is accepted at any
    /// time, matching the order component's permissiveness.
    #[tracing::instrument(skip(self))]
    pub fn update_status(
        &self,
        shipment_id: &str,
        status: ShipmentStatus,
        location: Option<String>,
        note: Option<String>,
    ) -> Result<Shipment> {
        let mut inner = self.inner.write().unwrap();
        let shipment = inner
            .shipments
            .get_mut(shipment_id)
            .ok_or_else(|| ShippingError::NotFound(shipment_id.to_string()))?;

        let now = Utc::now();
        shipment.status = status;
        shipment.updated_at = now;
        shipment.history.push(HistoryEntry {
            status,
            timestamp: now,
            location: location.unwrap_or_else(|| "Unknown".to_string()),
            note: note.unwrap_or_default(),
        });

        tracing::info!(shipment_id, %status, "shipment status updated");
        Ok(shipment.clone())
    }

    /// Cancels a shipment still in `pending` or `preparing`.
    #[tracing::instrument(skip(self))]
    pub fn cancel(&self, shipment_id: &str) -> Result<Shipment> {
        let mut inner = self.inner.write().unwrap();
        let shipment = inner
            .shipments
            .get_mut(shipment_id)
            .ok_or_else(|| ShippingError::NotFound(shipment_id.to_string()))?;

        if !shipment.status.can_cancel() {
            return Err(ShippingError::CannotCancel {
                status: shipment.status,
            });
        }

        let now = Utc::now();
        shipment.status = ShipmentStatus::Cancelled;
        shipment.updated_at = now;
        shipment.history.push(HistoryEntry {
            status: ShipmentStatus::Cancelled,
            timestamp: now,
            location: "System".to_string(),
            note: "Shipment cancelled by user".to_string(),
        });

        metrics::counter!("shipments_cancelled_total").increment(1);
        tracing::info!(shipment_id, "shipment cancelled");
        Ok(shipment.clone())
    }

    /// Estimates cost and delivery time per carrier for a package weight.
    pub fn estimate(&self, weight_kg: f64) -> Result<Vec<CarrierEstimate>> {
        let mut rng = self.rng.lock().unwrap();
        estimate_with(weight_kg, &mut *rng)
    }
}

impl Default for ShipmentTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_shipment(tracker: &ShipmentTracker) -> Shipment {
        tracker
            .create(
                OrderId::new(1),
                "Alice",
                "1 Main St",
                vec!["PROD-001".to_string()],
            )
            .unwrap()
    }

    #[test]
    fn create_assigns_ids_carrier_and_initial_history() {
        let tracker = ShipmentTracker::seeded(42);
        let shipment = create_shipment(&tracker);

        assert_eq!(shipment.shipment_id, "SHIP-000001");
        assert!(CARRIERS.contains(&shipment.carrier.as_str()));
        assert!(
            shipment
                .tracking_number
                .starts_with(&shipment.carrier[..3].to_uppercase())
        );
        assert_eq!(shipment.status, ShipmentStatus::Pending);
        assert_eq!(shipment.history.len(), 1);
        assert_eq!(shipment.history[0].location, "Warehouse");

        let eta_days = (shipment.estimated_delivery - shipment.created_at).num_days();
        assert!((3..=7).contains(&eta_days));
    }

    #[test]
    fn create_requires_recipient_and_address() {
        let tracker = ShipmentTracker::seeded(1);
        assert!(matches!(
            tracker.create(OrderId::new(1), "", "1 Main St", vec![]),
            Err(ShippingError::MissingField("recipient"))
        ));
        assert!(matches!(
            tracker.create(OrderId::new(1), "Alice", "  ", vec![]),
            Err(ShippingError::MissingField("address"))
        ));
    }

    #[test]
    fn seeded_trackers_assign_identically() {
        let a = create_shipment(&ShipmentTracker::seeded(7));
        let b = create_shipment(&ShipmentTracker::seeded(7));
        assert_eq!(a.carrier, b.carrier);
        assert_eq!(a.tracking_number, b.tracking_number);
    }

    #[test]
    fn every_update_appends_exactly_one_history_entry() {
        let tracker = ShipmentTracker::seeded(42);
        let shipment = create_shipment(&tracker);

        let updated = tracker
            .update_status(
                &shipment.shipment_id,
                ShipmentStatus::InTransit,
                Some("Hub A".to_string()),
                None,
            )
            .unwrap();
        assert_eq!(updated.history.len(), 2);

        // Backward move still appends
        let updated = tracker
            .update_status(&shipment.shipment_id, ShipmentStatus::Preparing, None, None)
            .unwrap();
        assert_eq!(updated.history.len(), 3);
        assert_eq!(updated.history[2].location, "Unknown");
        assert_eq!(updated.status, ShipmentStatus::Preparing);
    }

    #[test]
    fn cancel_guarded_after_transit() {
        let tracker = ShipmentTracker::seeded(42);
        let shipment = create_shipment(&tracker);

        tracker
            .update_status(&shipment.shipment_id, ShipmentStatus::InTransit, None, None)
            .unwrap();

        let result = tracker.cancel(&shipment.shipment_id);
        assert!(matches!(
            result,
            Err(ShippingError::CannotCancel {
                status: ShipmentStatus::InTransit
            })
        ));
        // Status and history untouched by the rejected cancel
        let reloaded = tracker.get(&shipment.shipment_id).unwrap();
        assert_eq!(reloaded.status, ShipmentStatus::InTransit);
        assert_eq!(reloaded.history.len(), 2);
    }

    #[test]
    fn cancel_from_pending_appends_entry() {
        let tracker = ShipmentTracker::seeded(42);
        let shipment = create_shipment(&tracker);

        let cancelled = tracker.cancel(&shipment.shipment_id).unwrap();
        assert_eq!(cancelled.status, ShipmentStatus::Cancelled);
        assert_eq!(cancelled.history.len(), 2);
        assert_eq!(cancelled.history[1].note, "Shipment cancelled by user");
    }

    #[test]
    fn list_filters_by_status_and_order() {
        let tracker = ShipmentTracker::seeded(42);
        let s1 = create_shipment(&tracker);
        tracker
            .create(OrderId::new(2), "Bob", "2 Side St", vec![])
            .unwrap();
        tracker
            .update_status(&s1.shipment_id, ShipmentStatus::InTransit, None, None)
            .unwrap();

        assert_eq!(tracker.list(None, None).len(), 2);
        assert_eq!(tracker.list(Some(ShipmentStatus::InTransit), None).len(), 1);
        assert_eq!(tracker.list(None, Some(OrderId::new(2))).len(), 1);
        assert_eq!(
            tracker
                .list(Some(ShipmentStatus::Pending), Some(OrderId::new(1)))
                .len(),
            0
        );
    }

    #[test]
    fn track_returns_subset() {
        let tracker = ShipmentTracker::seeded(42);
        let shipment = create_shipment(&tracker);

        let view = tracker.track(&shipment.shipment_id).unwrap();
        assert_eq!(view.tracking_number, shipment.tracking_number);
        assert_eq!(view.history.len(), 1);
    }

    #[test]
    fn unknown_shipment_is_not_found() {
        let tracker = ShipmentTracker::seeded(42);
        assert!(matches!(
            tracker.get("SHIP-404"),
            Err(ShippingError::NotFound(_))
        ));
    }
}
