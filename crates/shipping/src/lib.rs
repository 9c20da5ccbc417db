//! Shipment tracking for the fulfillment system.
//!
//! An independent state machine invoked after an order is confirmed.
//! Every status change appends exactly one entry to the shipment's
//! history log; only `cancel` is guarded. Carrier assignment, tracking
//! numbers, and delivery estimates come from an injected seedable RNG
//! so tests can pin them.

pub mod error;
pub mod estimate;
pub mod shipment;
pub mod status;
pub mod tracker;

pub use error::ShippingError;
pub use estimate::{CarrierEstimate, estimate_with};
pub use shipment::{HistoryEntry, Shipment, TrackingView};
pub use status::ShipmentStatus;
pub use tracker::{CARRIERS, ShipmentTracker};
