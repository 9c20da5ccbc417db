//! HTTP API server with observability for the fulfillment system.
//!
//! Exposes REST endpoints over the stock ledger, payment processor,
//! order orchestrator, and shipment tracker, with structured logging
//! (tracing) and Prometheus metrics.

pub mod clients;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, patch, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use orders::{OrderOrchestrator, OrderStore};
use payments::{PaymentGateway, PaymentProcessor, SimulatedGateway};
use shipping::ShipmentTracker;
use stock::StockLedger;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use clients::{DirectPaymentClient, DirectProductClient};

/// Shared application state accessible from all handlers.
pub struct AppState<G: PaymentGateway> {
    pub ledger: StockLedger,
    pub payments: PaymentProcessor<G>,
    pub orders: OrderOrchestrator<DirectProductClient, DirectPaymentClient<G>>,
    pub shipping: ShipmentTracker,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<G: PaymentGateway + Clone + 'static>(
    state: Arc<AppState<G>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        // Products / stock ledger
        .route("/products", post(routes::products::create::<G>))
        .route("/products", get(routes::products::list::<G>))
        .route("/products/low-stock", get(routes::products::low_stock::<G>))
        .route("/products/{id}", get(routes::products::get::<G>))
        .route("/products/{id}", put(routes::products::update::<G>))
        .route("/products/{id}/stock", patch(routes::products::adjust_stock::<G>))
        .route("/products/{id}/reserve", post(routes::products::reserve::<G>))
        .route("/products/{id}/release", post(routes::products::release::<G>))
        // Orders
        .route("/orders", post(routes::orders::create::<G>))
        .route("/orders/{id}", get(routes::orders::get::<G>))
        .route("/orders/user/{user_id}", get(routes::orders::for_user::<G>))
        .route("/orders/{id}/status", patch(routes::orders::update_status::<G>))
        .route("/orders/{id}/cancel", post(routes::orders::cancel::<G>))
        .route("/orders/{id}/pay", post(routes::orders::pay::<G>))
        // Payments
        .route("/payments", post(routes::payments::create::<G>))
        .route("/payments/{id}", get(routes::payments::get::<G>))
        .route("/payments/{id}/process", post(routes::payments::process::<G>))
        .route("/payments/{id}/refund", post(routes::payments::refund::<G>))
        .route("/payments/order/{order_id}", get(routes::payments::for_order::<G>))
        .route("/payments/user/{user_id}", get(routes::payments::for_user::<G>))
        // Shipments
        .route("/shipments", post(routes::shipments::create::<G>))
        .route("/shipments", get(routes::shipments::list::<G>))
        .route("/shipments/estimate", post(routes::shipments::estimate::<G>))
        .route("/shipments/{id}", get(routes::shipments::get::<G>))
        .route("/shipments/{id}", delete(routes::shipments::cancel::<G>))
        .route("/shipments/{id}/track", get(routes::shipments::track::<G>))
        .route("/shipments/{id}/status", put(routes::shipments::update_status::<G>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state wired around the given payment gateway.
///
/// The orchestrator talks to the same ledger and payment processor the
/// standalone endpoints expose, through in-process client adapters.
pub fn create_state<G: PaymentGateway + Clone>(gateway: G) -> Arc<AppState<G>> {
    let ledger = StockLedger::new();
    let payments = PaymentProcessor::new(gateway);
    let orders = OrderOrchestrator::new(
        OrderStore::new(),
        DirectProductClient::new(ledger.clone()),
        DirectPaymentClient::new(payments.clone()),
    );

    Arc::new(AppState {
        ledger,
        payments,
        orders,
        shipping: ShipmentTracker::new(),
    })
}

/// Creates the default application state with the simulated gateway.
pub fn create_default_state() -> Arc<AppState<SimulatedGateway>> {
    create_state(SimulatedGateway::new())
}
