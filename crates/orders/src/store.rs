//! Order records and their in-memory store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use common::{Money, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::{OrderError, Result};
use crate::status::OrderStatus;

/// An order owned exclusively by the orchestrator.
///
/// `total_price` is fixed at creation time and never recomputed, even
/// if the catalog price changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub total_price: Money,
    pub status: OrderStatus,
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct OrderStoreInner {
    orders: HashMap<OrderId, Order>,
    next_id: u64,
}

/// In-memory order store with monotonic ID assignment.
///
/// Single-writer access per entity: all read-modify-write goes through
/// the writer lock.
#[derive(Debug, Clone, Default)]
pub struct OrderStore {
    inner: Arc<RwLock<OrderStoreInner>>,
}

impl OrderStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists a new pending order and assigns the next ID.
    pub fn insert(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
        total_price: Money,
    ) -> Order {
        let mut inner = self.inner.write().unwrap();
        inner.next_id += 1;
        let now = Utc::now();
        let order = Order {
            id: OrderId::new(inner.next_id),
            user_id,
            product_id,
            quantity,
            total_price,
            status: OrderStatus::Pending,
            payment_id: None,
            created_at: now,
            updated_at: now,
        };
        inner.orders.insert(order.id, order.clone());
        order
    }

    /// Returns an order by ID.
    pub fn get(&self, order_id: OrderId) -> Result<Order> {
        self.inner
            .read()
            .unwrap()
            .orders
            .get(&order_id)
            .cloned()
            .ok_or(OrderError::NotFound(order_id))
    }

    /// Returns all orders placed by a user, oldest first.
    pub fn for_user(&self, user_id: UserId) -> Vec<Order> {
        let inner = self.inner.read().unwrap();
        let mut orders: Vec<Order> = inner
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.id);
        orders
    }

    /// Overwrites an order's status.
    pub fn set_status(&self, order_id: OrderId, status: OrderStatus) -> Result<Order> {
        let mut inner = self.inner.write().unwrap();
        let order = inner
            .orders
            .get_mut(&order_id)
            .ok_or(OrderError::NotFound(order_id))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    /// Attaches a payment and moves the order to the given status.
    pub fn set_payment(
        &self,
        order_id: OrderId,
        payment_id: String,
        status: OrderStatus,
    ) -> Result<Order> {
        let mut inner = self.inner.write().unwrap();
        let order = inner
            .orders
            .get_mut(&order_id)
            .ok_or(OrderError::NotFound(order_id))?;
        order.payment_id = Some(payment_id);
        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    /// Number of orders in the store.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().orders.len()
    }

    /// Returns true if the store holds no orders.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
