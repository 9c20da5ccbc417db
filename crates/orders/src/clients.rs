//! Client traits for the orchestrator's collaborators, with in-memory
//! implementations for testing.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{Money, OrderId, ProductId, UserId};
use thiserror::Error;

/// Errors surfaced by collaborator calls.
///
/// There is no retry anywhere: a timeout or connection failure becomes
/// `Unavailable` and propagates to the orchestrator as-is.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The entity does not exist upstream.
    #[error("not found")]
    NotFound,

    /// The upstream service is unreachable or timed out.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
}

/// Product view the orchestrator needs to validate and price an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub price: Money,
    pub available: u32,
}

/// Access to the product/stock service.
#[async_trait]
pub trait ProductClient: Send + Sync {
    /// Fetches price and availability for a product.
    async fn fetch(&self, product_id: &ProductId) -> Result<ProductSnapshot, ClientError>;

    /// Applies a direct quantity delta (negative commits, positive restores).
    async fn adjust_stock(&self, product_id: &ProductId, delta: i64) -> Result<(), ClientError>;
}

/// Terminal result of a processed payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub payment_id: String,
    pub completed: bool,
    pub transaction_id: Option<String>,
}

/// Access to the payment service.
#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Creates a pending payment for an order, returning its ID.
    async fn create_payment(
        &self,
        order_id: OrderId,
        user_id: UserId,
        amount: Money,
        method: &str,
    ) -> Result<String, ClientError>;

    /// Processes a pending payment to a terminal status.
    async fn process_payment(&self, payment_id: &str) -> Result<PaymentReceipt, ClientError>;
}

#[derive(Debug, Default)]
struct InMemoryProductState {
    products: HashMap<ProductId, (Money, u32)>,
    fail_fetch: bool,
    fail_adjust: bool,
}

/// In-memory product client for testing the orchestrator in isolation.
///
/// Tracks a plain stock count per product so scenarios can observe the
/// effect of commits and restores.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductClient {
    state: Arc<RwLock<InMemoryProductState>>,
}

impl InMemoryProductClient {
    /// Creates an empty client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product with the given price and stock.
    pub fn add_product(&self, product_id: ProductId, price: Money, stock: u32) {
        self.state
            .write()
            .unwrap()
            .products
            .insert(product_id, (price, stock));
    }

    /// Returns the current stock count for a product.
    pub fn stock(&self, product_id: &ProductId) -> Option<u32> {
        self.state
            .read()
            .unwrap()
            .products
            .get(product_id)
            .map(|(_, stock)| *stock)
    }

    /// Makes every `fetch` call fail as unavailable.
    pub fn set_fail_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_fetch = fail;
    }

    /// Makes every `adjust_stock` call fail as unavailable.
    pub fn set_fail_adjust(&self, fail: bool) {
        self.state.write().unwrap().fail_adjust = fail;
    }
}

#[async_trait]
impl ProductClient for InMemoryProductClient {
    async fn fetch(&self, product_id: &ProductId) -> Result<ProductSnapshot, ClientError> {
        let state = self.state.read().unwrap();
        if state.fail_fetch {
            return Err(ClientError::Unavailable("connection refused".to_string()));
        }
        state
            .products
            .get(product_id)
            .map(|(price, stock)| ProductSnapshot {
                price: *price,
                available: *stock,
            })
            .ok_or(ClientError::NotFound)
    }

    async fn adjust_stock(&self, product_id: &ProductId, delta: i64) -> Result<(), ClientError> {
        let mut state = self.state.write().unwrap();
        if state.fail_adjust {
            return Err(ClientError::Unavailable("request timed out".to_string()));
        }
        let (_, stock) = state
            .products
            .get_mut(product_id)
            .ok_or(ClientError::NotFound)?;
        let new_stock = *stock as i64 + delta;
        if new_stock < 0 {
            return Err(ClientError::Unavailable("insufficient stock".to_string()));
        }
        *stock = new_stock as u32;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    payments: HashMap<String, (OrderId, UserId, Money)>,
    next_id: u32,
    decline: bool,
    fail_create: bool,
}

/// In-memory payment client for testing; outcome is pinned via [`Self::set_decline`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentClient {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentClient {
    /// Creates a client that approves everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every processed payment come back `failed`.
    pub fn set_decline(&self, decline: bool) {
        self.state.write().unwrap().decline = decline;
    }

    /// Makes `create_payment` fail as unavailable.
    pub fn set_fail_create(&self, fail: bool) {
        self.state.write().unwrap().fail_create = fail;
    }

    /// Returns the number of payments created.
    pub fn payment_count(&self) -> usize {
        self.state.read().unwrap().payments.len()
    }
}

#[async_trait]
impl PaymentClient for InMemoryPaymentClient {
    async fn create_payment(
        &self,
        order_id: OrderId,
        user_id: UserId,
        amount: Money,
        _method: &str,
    ) -> Result<String, ClientError> {
        let mut state = self.state.write().unwrap();
        if state.fail_create {
            return Err(ClientError::Unavailable("connection refused".to_string()));
        }
        state.next_id += 1;
        let payment_id = format!("PAY-{:04}", state.next_id);
        state
            .payments
            .insert(payment_id.clone(), (order_id, user_id, amount));
        Ok(payment_id)
    }

    async fn process_payment(&self, payment_id: &str) -> Result<PaymentReceipt, ClientError> {
        let state = self.state.read().unwrap();
        if !state.payments.contains_key(payment_id) {
            return Err(ClientError::NotFound);
        }
        if state.decline {
            Ok(PaymentReceipt {
                payment_id: payment_id.to_string(),
                completed: false,
                transaction_id: None,
            })
        } else {
            Ok(PaymentReceipt {
                payment_id: payment_id.to_string(),
                completed: true,
                transaction_id: Some(format!("TXN-{payment_id}")),
            })
        }
    }
}
