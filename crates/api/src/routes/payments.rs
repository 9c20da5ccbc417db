//! Standalone payment endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{Money, OrderId, UserId};
use payments::{Payment, PaymentGateway};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreatePaymentRequest {
    pub order_id: u64,
    pub user_id: u64,
    pub amount_cents: i64,
    pub currency: Option<String>,
    pub payment_method: Option<String>,
}

/// POST /payments — create a pending payment.
#[tracing::instrument(skip(state, req))]
pub async fn create<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<CreatePaymentRequest>,
) -> (StatusCode, Json<Payment>) {
    let payment = state.payments.create(
        OrderId::new(req.order_id),
        UserId::new(req.user_id),
        Money::from_cents(req.amount_cents),
        req.currency.unwrap_or_else(|| "USD".to_string()),
        req.payment_method.unwrap_or_else(|| "card".to_string()),
    );
    (StatusCode::CREATED, Json(payment))
}

/// GET /payments/:id — load a payment by ID.
#[tracing::instrument(skip(state))]
pub async fn get<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(state.payments.get(&id)?))
}

/// POST /payments/:id/process — consult the gateway for an outcome.
#[tracing::instrument(skip(state))]
pub async fn process<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(state.payments.process(&id)?))
}

/// POST /payments/:id/refund — refund a completed payment.
#[tracing::instrument(skip(state))]
pub async fn refund<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(state.payments.refund(&id)?))
}

/// GET /payments/order/:order_id — first payment recorded for an order.
#[tracing::instrument(skip(state))]
pub async fn for_order<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(order_id): Path<u64>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(state.payments.for_order(OrderId::new(order_id))?))
}

/// GET /payments/user/:user_id — every payment made by a user.
#[tracing::instrument(skip(state))]
pub async fn for_user<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(user_id): Path<u64>,
) -> Json<Vec<Payment>> {
    Json(state.payments.for_user(UserId::new(user_id)))
}
