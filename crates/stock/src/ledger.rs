//! The stock ledger: atomic reserve/release/adjust over per-product counters.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use common::{Money, OrderId, ProductId};

use crate::error::{Result, StockError};
use crate::record::{LowStockItem, StockRecord, StockSnapshot};

/// Available-count threshold below which a product needs restocking.
const RESTOCK_THRESHOLD: u32 = 10;

/// Guards the `quantity`/`reserved` pair for each product against
/// over-allocation.
///
/// All mutations take the writer lock, so operations against the same
/// product are mutually exclusive: two concurrent `reserve` calls can
/// never both succeed on the last available unit.
///
/// Two disciplines are exposed and the caller picks one per product:
/// `reserve`/`release` track provisional allocation in `reserved`, while
/// `adjust` commits directly against `quantity`. Combining both on a
/// single product double-counts its available units and is out of
/// contract.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    inner: Arc<RwLock<HashMap<ProductId, StockRecord>>>,
}

impl StockLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new product to the ledger with zero reserved units.
    #[tracing::instrument(skip(self))]
    pub fn add_product(
        &self,
        product_id: ProductId,
        name: impl Into<String> + std::fmt::Debug,
        quantity: u32,
        price: Money,
    ) -> Result<StockSnapshot> {
        let mut inner = self.inner.write().unwrap();
        if inner.contains_key(&product_id) {
            return Err(StockError::AlreadyExists(product_id));
        }

        let record = StockRecord {
            name: name.into(),
            quantity,
            reserved: 0,
            price,
        };
        let snapshot = StockSnapshot::new(product_id.clone(), &record);
        inner.insert(product_id, record);
        Ok(snapshot)
    }

    /// Returns a point-in-time snapshot of a product's stock.
    pub fn get(&self, product_id: &ProductId) -> Result<StockSnapshot> {
        let inner = self.inner.read().unwrap();
        let record = inner
            .get(product_id)
            .ok_or_else(|| StockError::NotFound(product_id.clone()))?;
        Ok(StockSnapshot::new(product_id.clone(), record))
    }

    /// Returns snapshots for every product in the ledger.
    pub fn list(&self) -> Vec<StockSnapshot> {
        let inner = self.inner.read().unwrap();
        let mut snapshots: Vec<StockSnapshot> = inner
            .iter()
            .map(|(id, record)| StockSnapshot::new(id.clone(), record))
            .collect();
        snapshots.sort_by(|a, b| a.product_id.as_str().cmp(b.product_id.as_str()));
        snapshots
    }

    /// Provisionally allocates `qty` units to an order.
    ///
    /// Returns the remaining available count after the reservation.
    #[tracing::instrument(skip(self))]
    pub fn reserve(&self, product_id: &ProductId, qty: u32, order_id: OrderId) -> Result<u32> {
        let mut inner = self.inner.write().unwrap();
        let record = inner
            .get_mut(product_id)
            .ok_or_else(|| StockError::NotFound(product_id.clone()))?;

        let available = record.available();
        if available < qty {
            return Err(StockError::InsufficientStock {
                available,
                requested: qty,
            });
        }

        record.reserved += qty;
        metrics::counter!("stock_reservations_total").increment(1);
        tracing::info!(%product_id, qty, %order_id, "stock reserved");
        Ok(record.available())
    }

    /// Releases `qty` previously reserved units back to the sellable pool.
    #[tracing::instrument(skip(self))]
    pub fn release(&self, product_id: &ProductId, qty: u32, order_id: OrderId) -> Result<u32> {
        let mut inner = self.inner.write().unwrap();
        let record = inner
            .get_mut(product_id)
            .ok_or_else(|| StockError::NotFound(product_id.clone()))?;

        if record.reserved < qty {
            return Err(StockError::OverRelease {
                reserved: record.reserved,
                requested: qty,
            });
        }

        record.reserved -= qty;
        metrics::counter!("stock_releases_total").increment(1);
        tracing::info!(%product_id, qty, %order_id, "stock released");
        Ok(record.reserved)
    }

    /// Applies a direct delta to `quantity` (the order-path discipline).
    ///
    /// A negative delta commits stock to an order; a positive delta
    /// restores it on cancellation. Fails if the result would be
    /// negative, fall below the reserved amount, or overflow the
    /// counter; a rejected adjust leaves the record untouched.
    #[tracing::instrument(skip(self))]
    pub fn adjust(&self, product_id: &ProductId, delta: i64) -> Result<StockSnapshot> {
        let mut inner = self.inner.write().unwrap();
        let record = inner
            .get_mut(product_id)
            .ok_or_else(|| StockError::NotFound(product_id.clone()))?;

        let new_quantity = (record.quantity as i64)
            .checked_add(delta)
            .ok_or(StockError::QuantityOverflow { delta })?;
        if new_quantity < 0 {
            return Err(StockError::InsufficientStock {
                available: record.quantity,
                requested: delta.unsigned_abs() as u32,
            });
        }
        // Keeps `reserved <= quantity` even when a caller mixes the two
        // disciplines on one product.
        if new_quantity < record.reserved as i64 {
            return Err(StockError::QuantityBelowReserved {
                reserved: record.reserved,
            });
        }
        if new_quantity > u32::MAX as i64 {
            return Err(StockError::QuantityOverflow { delta });
        }

        record.quantity = new_quantity as u32;
        tracing::info!(%product_id, delta, quantity = record.quantity, "stock adjusted");
        Ok(StockSnapshot::new(product_id.clone(), record))
    }

    /// Overwrites quantity and/or price for a product.
    ///
    /// The new quantity may not fall below the currently reserved amount.
    #[tracing::instrument(skip(self))]
    pub fn update(
        &self,
        product_id: &ProductId,
        quantity: Option<u32>,
        price: Option<Money>,
    ) -> Result<StockSnapshot> {
        let mut inner = self.inner.write().unwrap();
        let record = inner
            .get_mut(product_id)
            .ok_or_else(|| StockError::NotFound(product_id.clone()))?;

        if let Some(new_quantity) = quantity {
            if new_quantity < record.reserved {
                return Err(StockError::QuantityBelowReserved {
                    reserved: record.reserved,
                });
            }
            record.quantity = new_quantity;
        }
        if let Some(new_price) = price {
            record.price = new_price;
        }

        Ok(StockSnapshot::new(product_id.clone(), record))
    }

    /// Returns products whose available count is at or below `threshold`.
    pub fn low_stock(&self, threshold: u32) -> Vec<LowStockItem> {
        let inner = self.inner.read().unwrap();
        let mut items: Vec<LowStockItem> = inner
            .iter()
            .filter(|(_, record)| record.available() <= threshold)
            .map(|(id, record)| LowStockItem {
                product_id: id.clone(),
                name: record.name.clone(),
                available: record.available(),
                quantity: record.quantity,
                reserved: record.reserved,
                needs_restock: record.available() < RESTOCK_THRESHOLD,
            })
            .collect();
        items.sort_by(|a, b| a.product_id.as_str().cmp(b.product_id.as_str()));
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with_product(quantity: u32) -> (StockLedger, ProductId) {
        let ledger = StockLedger::new();
        let product_id = ProductId::new("PROD-001");
        ledger
            .add_product(product_id.clone(), "Laptop", quantity, Money::from_cents(99999))
            .unwrap();
        (ledger, product_id)
    }

    #[test]
    fn add_product_rejects_duplicates() {
        let (ledger, product_id) = ledger_with_product(50);
        let result = ledger.add_product(product_id, "Laptop", 10, Money::from_cents(1));
        assert!(matches!(result, Err(StockError::AlreadyExists(_))));
    }

    #[test]
    fn get_unknown_product_fails() {
        let ledger = StockLedger::new();
        let result = ledger.get(&ProductId::new("PROD-404"));
        assert!(matches!(result, Err(StockError::NotFound(_))));
    }

    #[test]
    fn reserve_decrements_available() {
        let (ledger, product_id) = ledger_with_product(50);

        let remaining = ledger.reserve(&product_id, 5, OrderId::new(1)).unwrap();
        assert_eq!(remaining, 45);

        let snapshot = ledger.get(&product_id).unwrap();
        assert_eq!(snapshot.quantity, 50);
        assert_eq!(snapshot.reserved, 5);
        assert_eq!(snapshot.available, 45);
    }

    #[test]
    fn reserve_fails_when_insufficient() {
        let (ledger, product_id) = ledger_with_product(10);
        ledger.reserve(&product_id, 8, OrderId::new(1)).unwrap();

        let result = ledger.reserve(&product_id, 3, OrderId::new(2));
        assert!(matches!(
            result,
            Err(StockError::InsufficientStock {
                available: 2,
                requested: 3
            })
        ));

        // Failed reserve must leave counters untouched
        let snapshot = ledger.get(&product_id).unwrap();
        assert_eq!(snapshot.reserved, 8);
    }

    #[test]
    fn release_is_inverse_of_reserve() {
        let (ledger, product_id) = ledger_with_product(50);
        let before = ledger.get(&product_id).unwrap();

        ledger.reserve(&product_id, 7, OrderId::new(1)).unwrap();
        ledger.release(&product_id, 7, OrderId::new(1)).unwrap();

        let after = ledger.get(&product_id).unwrap();
        assert_eq!(after.reserved, before.reserved);
        assert_eq!(after.available, before.available);
    }

    #[test]
    fn release_more_than_reserved_fails() {
        let (ledger, product_id) = ledger_with_product(50);
        ledger.reserve(&product_id, 2, OrderId::new(1)).unwrap();

        let result = ledger.release(&product_id, 3, OrderId::new(1));
        assert!(matches!(
            result,
            Err(StockError::OverRelease {
                reserved: 2,
                requested: 3
            })
        ));
    }

    #[test]
    fn adjust_commits_and_restores_quantity() {
        let (ledger, product_id) = ledger_with_product(10);

        let snapshot = ledger.adjust(&product_id, -3).unwrap();
        assert_eq!(snapshot.quantity, 7);

        let snapshot = ledger.adjust(&product_id, 3).unwrap();
        assert_eq!(snapshot.quantity, 10);
    }

    #[test]
    fn adjust_below_zero_fails() {
        let (ledger, product_id) = ledger_with_product(10);

        let result = ledger.adjust(&product_id, -15);
        assert!(matches!(result, Err(StockError::InsufficientStock { .. })));

        // Quantity unchanged after the failed adjust
        assert_eq!(ledger.get(&product_id).unwrap().quantity, 10);
    }

    #[test]
    fn adjust_below_reserved_fails_and_ledger_stays_usable() {
        let (ledger, product_id) = ledger_with_product(10);
        ledger.reserve(&product_id, 8, OrderId::new(1)).unwrap();

        let result = ledger.adjust(&product_id, -5);
        assert!(matches!(
            result,
            Err(StockError::QuantityBelowReserved { reserved: 8 })
        ));

        // The rejected adjust must not poison the lock or the record
        let snapshot = ledger.get(&product_id).unwrap();
        assert_eq!(snapshot.quantity, 10);
        assert_eq!(snapshot.reserved, 8);
        assert_eq!(snapshot.available, 2);
        assert!(ledger.adjust(&product_id, -2).is_ok());
    }

    #[test]
    fn adjust_past_counter_capacity_fails() {
        let ledger = StockLedger::new();
        let product_id = ProductId::new("PROD-001");
        ledger
            .add_product(product_id.clone(), "Laptop", u32::MAX - 1, Money::from_cents(1))
            .unwrap();

        let result = ledger.adjust(&product_id, 2);
        assert!(matches!(
            result,
            Err(StockError::QuantityOverflow { delta: 2 })
        ));
        assert_eq!(ledger.get(&product_id).unwrap().quantity, u32::MAX - 1);

        assert!(ledger.adjust(&product_id, 1).is_ok());

        // A delta large enough to overflow the i64 arithmetic itself
        assert!(matches!(
            ledger.adjust(&product_id, i64::MAX),
            Err(StockError::QuantityOverflow { .. })
        ));
    }

    #[test]
    fn update_quantity_below_reserved_fails() {
        let (ledger, product_id) = ledger_with_product(50);
        ledger.reserve(&product_id, 5, OrderId::new(1)).unwrap();

        let result = ledger.update(&product_id, Some(3), None);
        assert!(matches!(
            result,
            Err(StockError::QuantityBelowReserved { reserved: 5 })
        ));
    }

    #[test]
    fn update_price_only() {
        let (ledger, product_id) = ledger_with_product(50);
        let snapshot = ledger
            .update(&product_id, None, Some(Money::from_cents(89999)))
            .unwrap();
        assert_eq!(snapshot.price, Money::from_cents(89999));
        assert_eq!(snapshot.quantity, 50);
    }

    #[test]
    fn low_stock_report() {
        let ledger = StockLedger::new();
        ledger
            .add_product(ProductId::new("PROD-001"), "Laptop", 50, Money::from_cents(99999))
            .unwrap();
        ledger
            .add_product(ProductId::new("PROD-002"), "Mouse", 12, Money::from_cents(2999))
            .unwrap();
        ledger
            .add_product(ProductId::new("PROD-003"), "Cable", 4, Money::from_cents(999))
            .unwrap();

        let items = ledger.low_stock(20);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id, ProductId::new("PROD-002"));
        assert!(!items[0].needs_restock);
        assert!(items[1].needs_restock);
    }

    #[test]
    fn concurrent_reserves_cannot_both_take_last_units() {
        let (ledger, product_id) = ledger_with_product(10);

        let mut handles = Vec::new();
        for i in 0..2 {
            let ledger = ledger.clone();
            let product_id = product_id.clone();
            handles.push(std::thread::spawn(move || {
                ledger.reserve(&product_id, 10, OrderId::new(i))
            }));
        }

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(StockError::InsufficientStock { .. })))
        );

        let snapshot = ledger.get(&product_id).unwrap();
        assert_eq!(snapshot.reserved, 10);
        assert_eq!(snapshot.available, 0);
    }

    #[test]
    fn reserved_never_exceeds_quantity_under_contention() {
        let (ledger, product_id) = ledger_with_product(100);

        let mut handles = Vec::new();
        for i in 0..8 {
            let ledger = ledger.clone();
            let product_id = product_id.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..10 {
                    let _ = ledger.reserve(&product_id, 3, OrderId::new(i));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = ledger.get(&product_id).unwrap();
        assert!(snapshot.reserved <= snapshot.quantity);
    }
}
