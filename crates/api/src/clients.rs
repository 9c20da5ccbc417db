//! In-process client adapters wiring the orchestrator to the ledger and
//! payment processor.
//!
//! In a deployed topology these calls would cross service boundaries;
//! here they bridge directly to the sibling crates while keeping the
//! orchestrator programmed against its client traits.

use async_trait::async_trait;
use common::{Money, OrderId, ProductId, UserId};
use orders::{ClientError, PaymentClient, PaymentReceipt, ProductClient, ProductSnapshot};
use payments::{PaymentGateway, PaymentProcessor, PaymentStatus};
use stock::{StockError, StockLedger};

/// Product client backed by the stock ledger.
#[derive(Debug, Clone)]
pub struct DirectProductClient {
    ledger: StockLedger,
}

impl DirectProductClient {
    pub fn new(ledger: StockLedger) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl ProductClient for DirectProductClient {
    async fn fetch(&self, product_id: &ProductId) -> Result<ProductSnapshot, ClientError> {
        let snapshot = self.ledger.get(product_id).map_err(|e| match e {
            StockError::NotFound(_) => ClientError::NotFound,
            other => ClientError::Unavailable(other.to_string()),
        })?;
        Ok(ProductSnapshot {
            price: snapshot.price,
            available: snapshot.available,
        })
    }

    async fn adjust_stock(&self, product_id: &ProductId, delta: i64) -> Result<(), ClientError> {
        self.ledger
            .adjust(product_id, delta)
            .map(|_| ())
            .map_err(|e| match e {
                StockError::NotFound(_) => ClientError::NotFound,
                other => ClientError::Unavailable(other.to_string()),
            })
    }
}

/// Payment client backed by the payment processor.
#[derive(Debug, Clone)]
pub struct DirectPaymentClient<G: PaymentGateway> {
    processor: PaymentProcessor<G>,
}

impl<G: PaymentGateway> DirectPaymentClient<G> {
    pub fn new(processor: PaymentProcessor<G>) -> Self {
        Self { processor }
    }
}

#[async_trait]
impl<G: PaymentGateway> PaymentClient for DirectPaymentClient<G> {
    async fn create_payment(
        &self,
        order_id: OrderId,
        user_id: UserId,
        amount: Money,
        method: &str,
    ) -> Result<String, ClientError> {
        let payment = self.processor.create(order_id, user_id, amount, "USD", method);
        Ok(payment.payment_id)
    }

    async fn process_payment(&self, payment_id: &str) -> Result<PaymentReceipt, ClientError> {
        let payment = self.processor.process(payment_id).map_err(|e| match e {
            payments::PaymentError::NotFound(_) => ClientError::NotFound,
            other => ClientError::Unavailable(other.to_string()),
        })?;
        Ok(PaymentReceipt {
            payment_id: payment.payment_id,
            completed: payment.status == PaymentStatus::Completed,
            transaction_id: payment.transaction_id,
        })
    }
}
