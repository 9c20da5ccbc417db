//! Stock record and read-only snapshot views.

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// Per-product stock state held by the ledger.
///
/// Invariant: `reserved <= quantity` at all times. Mutated only through
/// [`crate::StockLedger`] operations, never by direct field assignment
/// from outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Human-readable product name.
    pub name: String,
    /// Total units physically held.
    pub quantity: u32,
    /// Units provisionally allocated to orders.
    pub reserved: u32,
    /// Price per unit.
    pub price: Money,
}

impl StockRecord {
    /// Returns the sellable stock at this instant (`quantity - reserved`).
    pub fn available(&self) -> u32 {
        self.quantity - self.reserved
    }
}

/// Point-in-time view of a product's stock, returned by read operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub reserved: u32,
    pub available: u32,
    pub price: Money,
    pub in_stock: bool,
}

impl StockSnapshot {
    pub(crate) fn new(product_id: ProductId, record: &StockRecord) -> Self {
        let available = record.available();
        Self {
            product_id,
            name: record.name.clone(),
            quantity: record.quantity,
            reserved: record.reserved,
            available,
            price: record.price,
            in_stock: available > 0,
        }
    }
}

/// Entry in the low-stock report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub product_id: ProductId,
    pub name: String,
    pub available: u32,
    pub quantity: u32,
    pub reserved: u32,
    pub needs_restock: bool,
}
