//! Order creation, payment, and cancellation endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{OrderId, ProductId, UserId};
use orders::{Order, OrderStatus};
use payments::PaymentGateway;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: u64,
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Deserialize, Default)]
pub struct PayOrderRequest {
    pub payment_method: Option<String>,
}

#[derive(Serialize)]
pub struct PaymentOutcome {
    pub payment_id: String,
    pub completed: bool,
    pub transaction_id: Option<String>,
}

#[derive(Serialize)]
pub struct PayOrderResponse {
    pub order: Order,
    pub payment: PaymentOutcome,
}

/// POST /orders — create an order and commit stock best-effort.
#[tracing::instrument(skip(state, req))]
pub async fn create<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state
        .orders
        .create_order(
            UserId::new(req.user_id),
            ProductId::new(req.product_id),
            req.quantity,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/:id — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<u64>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.orders.get_order(OrderId::new(id))?))
}

/// GET /orders/user/:user_id — all orders placed by a user.
#[tracing::instrument(skip(state))]
pub async fn for_user<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(user_id): Path<u64>,
) -> Json<Vec<Order>> {
    Json(state.orders.orders_for_user(UserId::new(user_id)))
}

/// PATCH /orders/:id/status — overwrite the order status.
#[tracing::instrument(skip(state, req))]
pub async fn update_status<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<u64>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, ApiError> {
    let status: OrderStatus = req.status.parse()?;
    let order = state.orders.update_status(OrderId::new(id), status).await?;
    Ok(Json(order))
}

/// POST /orders/:id/cancel — cancel and restore stock best-effort.
#[tracing::instrument(skip(state))]
pub async fn cancel<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<u64>,
) -> Result<Json<Order>, ApiError> {
    let order = state.orders.cancel_order(OrderId::new(id)).await?;
    Ok(Json(order))
}

/// POST /orders/:id/pay — charge the order's fixed total.
#[tracing::instrument(skip(state, req))]
pub async fn pay<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<u64>,
    Json(req): Json<PayOrderRequest>,
) -> Result<Json<PayOrderResponse>, ApiError> {
    let method = req.payment_method.as_deref().unwrap_or("card");
    let (order, receipt) = state.orders.pay_order(OrderId::new(id), method).await?;
    Ok(Json(PayOrderResponse {
        order,
        payment: PaymentOutcome {
            payment_id: receipt.payment_id,
            completed: receipt.completed,
            transaction_id: receipt.transaction_id,
        },
    }))
}
