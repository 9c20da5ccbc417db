//! Payment records and the processor that drives their lifecycle.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use common::{Money, OrderId, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PaymentError, Result};
use crate::gateway::PaymentGateway;
use crate::status::PaymentStatus;

/// A payment tied to an order.
///
/// `transaction_id` is populated only when the gateway approves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: String,
    pub order_id: OrderId,
    pub user_id: UserId,
    pub amount: Money,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Accepts charge requests and transitions payments through their
/// status lifecycle.
///
/// Per-payment read-modify-write is serialized through the writer lock.
/// No uniqueness is enforced on `order_id`: the store will happily hold
/// several payments for one order, matching the upstream contract.
#[derive(Debug, Clone)]
pub struct PaymentProcessor<G: PaymentGateway> {
    payments: Arc<RwLock<HashMap<String, Payment>>>,
    gateway: G,
}

impl<G: PaymentGateway> PaymentProcessor<G> {
    /// Creates a processor backed by the given gateway.
    pub fn new(gateway: G) -> Self {
        Self {
            payments: Arc::new(RwLock::new(HashMap::new())),
            gateway,
        }
    }

    /// Creates a new pending payment with a fresh opaque payment ID.
    #[tracing::instrument(skip(self))]
    pub fn create(
        &self,
        order_id: OrderId,
        user_id: UserId,
        amount: Money,
        currency: impl Into<String> + std::fmt::Debug,
        payment_method: impl Into<String> + std::fmt::Debug,
    ) -> Payment {
        let now = Utc::now();
        let payment = Payment {
            payment_id: Uuid::new_v4().to_string(),
            order_id,
            user_id,
            amount,
            currency: currency.into(),
            status: PaymentStatus::Pending,
            payment_method: payment_method.into(),
            transaction_id: None,
            created_at: now,
            updated_at: now,
        };

        self.payments
            .write()
            .unwrap()
            .insert(payment.payment_id.clone(), payment.clone());

        metrics::counter!("payments_created_total").increment(1);
        tracing::info!(payment_id = %payment.payment_id, %order_id, "payment created");
        payment
    }

    /// Returns a payment by ID.
    pub fn get(&self, payment_id: &str) -> Result<Payment> {
        self.payments
            .read()
            .unwrap()
            .get(payment_id)
            .cloned()
            .ok_or_else(|| PaymentError::NotFound(payment_id.to_string()))
    }

    /// Consults the gateway and moves a pending payment to `completed`
    /// (with a transaction ID) or `failed` (without one).
    #[tracing::instrument(skip(self))]
    pub fn process(&self, payment_id: &str) -> Result<Payment> {
        let mut payments = self.payments.write().unwrap();
        let payment = payments
            .get_mut(payment_id)
            .ok_or_else(|| PaymentError::NotFound(payment_id.to_string()))?;

        if !payment.status.can_process() {
            return Err(PaymentError::InvalidTransition {
                action: "process",
                status: payment.status,
            });
        }

        if self.gateway.authorize() {
            payment.status = PaymentStatus::Completed;
            payment.transaction_id = Some(new_transaction_id());
            metrics::counter!("payments_completed_total").increment(1);
            tracing::info!(payment_id, "payment completed");
        } else {
            payment.status = PaymentStatus::Failed;
            metrics::counter!("payments_failed_total").increment(1);
            tracing::warn!(payment_id, "payment failed");
        }
        payment.updated_at = Utc::now();

        Ok(payment.clone())
    }

    /// Refunds a completed payment.
    #[tracing::instrument(skip(self))]
    pub fn refund(&self, payment_id: &str) -> Result<Payment> {
        let mut payments = self.payments.write().unwrap();
        let payment = payments
            .get_mut(payment_id)
            .ok_or_else(|| PaymentError::NotFound(payment_id.to_string()))?;

        if !payment.status.can_refund() {
            return Err(PaymentError::InvalidTransition {
                action: "refund",
                status: payment.status,
            });
        }

        payment.status = PaymentStatus::Refunded;
        payment.updated_at = Utc::now();
        metrics::counter!("payments_refunded_total").increment(1);
        tracing::info!(payment_id, "payment refunded");

        Ok(payment.clone())
    }

    /// Returns the first payment recorded for an order.
    pub fn for_order(&self, order_id: OrderId) -> Result<Payment> {
        let payments = self.payments.read().unwrap();
        let mut matches: Vec<&Payment> = payments
            .values()
            .filter(|p| p.order_id == order_id)
            .collect();
        matches.sort_by_key(|p| p.created_at);
        matches
            .first()
            .map(|p| (*p).clone())
            .ok_or_else(|| PaymentError::NotFound(format!("order {order_id}")))
    }

    /// Returns every payment made by a user.
    pub fn for_user(&self, user_id: UserId) -> Vec<Payment> {
        let payments = self.payments.read().unwrap();
        let mut matches: Vec<Payment> = payments
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        matches.sort_by_key(|p| p.created_at);
        matches
    }
}

fn new_transaction_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("TXN-{}", hex[..12].to_uppercase())
}
