//! The order fulfillment orchestrator.

use common::{OrderId, ProductId, UserId};

use crate::clients::{ClientError, PaymentClient, PaymentReceipt, ProductClient};
use crate::error::{OrderError, Result};
use crate::status::OrderStatus;
use crate::store::{Order, OrderStore};

/// Drives an order through creation, stock commitment, payment, and
/// cancellation with compensation.
///
/// The saga is synchronous and call-site compensated: there is no saga
/// log and no retry. Two windows are accepted by design and surfaced
/// only through logs:
///
/// - `create_order` commits stock best-effort *after* persisting the
///   order, so a pending order may exist whose stock was never
///   decremented.
/// - `cancel_order` restores stock best-effort *after* the cancellation
///   commits, so restoration may lag or be lost.
///
/// Reconciliation of either window is an out-of-band concern.
pub struct OrderOrchestrator<P, C>
where
    P: ProductClient,
    C: PaymentClient,
{
    store: OrderStore,
    products: P,
    payments: C,
}

impl<P, C> OrderOrchestrator<P, C>
where
    P: ProductClient,
    C: PaymentClient,
{
    /// Creates an orchestrator over the given store and clients.
    pub fn new(store: OrderStore, products: P, payments: C) -> Self {
        Self {
            store,
            products,
            payments,
        }
    }

    /// Returns the underlying order store.
    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    /// Creates an order after validating availability, then commits
    /// stock best-effort.
    ///
    /// The availability check and the stock commit are not atomic:
    /// a fetch failure is a hard fault (nothing is persisted), but a
    /// commit failure is swallowed and logged, leaving the order in
    /// `pending` with stock uncommitted.
    #[tracing::instrument(skip(self))]
    pub async fn create_order(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Order> {
        // 1. Availability check — hard fault, no retry, no partial state.
        let snapshot = self.products.fetch(&product_id).await.map_err(|e| match e {
            ClientError::NotFound => OrderError::ProductNotFound(product_id.clone()),
            ClientError::Unavailable(reason) => OrderError::Upstream(reason),
        })?;

        if snapshot.available < quantity {
            metrics::counter!("orders_rejected_total").increment(1);
            return Err(OrderError::InsufficientStock {
                available: snapshot.available,
                requested: quantity,
            });
        }

        // 2. Price is fixed here; later catalog changes never reprice the order.
        let total_price = snapshot.price.multiply(quantity);
        let order = self
            .store
            .insert(user_id, product_id.clone(), quantity, total_price);

        // 3. Best-effort stock commit. Failure does not roll the order back.
        if let Err(e) = self
            .products
            .adjust_stock(&product_id, -(quantity as i64))
            .await
        {
            metrics::counter!("stock_commit_failures_total").increment(1);
            tracing::error!(
                order_id = %order.id,
                %product_id,
                error = %e,
                "failed to commit stock; order left pending"
            );
        }

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, %user_id, "order created");
        Ok(order)
    }

    /// Cancels an order and restores committed stock best-effort.
    ///
    /// The cancellation itself is the commit point; a failed stock
    /// restoration is logged but never reverts it.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<Order> {
        let order = self.store.get(order_id)?;

        if !order.status.can_cancel() {
            return Err(OrderError::CannotCancel {
                status: order.status,
            });
        }

        let cancelled = self.store.set_status(order_id, OrderStatus::Cancelled)?;

        if let Err(e) = self
            .products
            .adjust_stock(&order.product_id, order.quantity as i64)
            .await
        {
            metrics::counter!("stock_restore_failures_total").increment(1);
            tracing::error!(
                %order_id,
                product_id = %order.product_id,
                error = %e,
                "failed to restore stock after cancellation"
            );
        }

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!(%order_id, "order cancelled");
        Ok(cancelled)
    }

    /// Overwrites an order's status unconditionally.
    ///
    /// No transition table is enforced here: advancement is driven by
    /// external shipment events, so any of the five statuses may replace
    /// any other, including backward moves.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(&self, order_id: OrderId, status: OrderStatus) -> Result<Order> {
        let order = self.store.set_status(order_id, status)?;
        tracing::info!(%order_id, %status, "order status updated");
        Ok(order)
    }

    /// Charges the order's fixed total through the payment service.
    ///
    /// A completed payment attaches its ID and confirms the order. A
    /// declined payment leaves the order pending and unmodified; the
    /// caller may retry with a fresh payment. Note the deliberate gap:
    /// a later `cancel_order` never refunds a completed payment.
    #[tracing::instrument(skip(self))]
    pub async fn pay_order(&self, order_id: OrderId, method: &str) -> Result<(Order, PaymentReceipt)> {
        let order = self.store.get(order_id)?;

        let payment_id = self
            .payments
            .create_payment(order_id, order.user_id, order.total_price, method)
            .await
            .map_err(|e| OrderError::Upstream(e.to_string()))?;

        let receipt = self
            .payments
            .process_payment(&payment_id)
            .await
            .map_err(|e| OrderError::Upstream(e.to_string()))?;

        let order = if receipt.completed {
            metrics::counter!("orders_paid_total").increment(1);
            tracing::info!(%order_id, payment_id, "payment completed, order confirmed");
            self.store
                .set_payment(order_id, payment_id, OrderStatus::Confirmed)?
        } else {
            tracing::warn!(%order_id, payment_id, "payment failed, order left pending");
            order
        };

        Ok((order, receipt))
    }

    /// Returns an order by ID.
    pub fn get_order(&self, order_id: OrderId) -> Result<Order> {
        self.store.get(order_id)
    }

    /// Returns all orders for a user.
    pub fn orders_for_user(&self, user_id: UserId) -> Vec<Order> {
        self.store.for_user(user_id)
    }
}
