//! Product catalog and stock ledger endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{Money, OrderId, ProductId};
use payments::PaymentGateway;
use serde::{Deserialize, Serialize};
use stock::{LowStockItem, StockSnapshot};

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price_cents: i64,
}

#[derive(Deserialize)]
pub struct AdjustStockRequest {
    pub quantity: i64,
}

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub quantity: Option<u32>,
    pub price_cents: Option<i64>,
}

#[derive(Deserialize)]
pub struct ReservationRequest {
    pub quantity: u32,
    pub order_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<u32>,
}

#[derive(Serialize)]
pub struct ReserveResponse {
    pub product_id: ProductId,
    pub order_id: u64,
    pub quantity: u32,
    pub remaining_available: u32,
}

#[derive(Serialize)]
pub struct ReleaseResponse {
    pub product_id: ProductId,
    pub order_id: u64,
    pub quantity: u32,
    pub reserved: u32,
}

#[derive(Serialize)]
pub struct LowStockResponse {
    pub threshold: u32,
    pub low_stock_count: usize,
    pub items: Vec<LowStockItem>,
}

/// POST /products — add a product to the ledger.
#[tracing::instrument(skip(state, req))]
pub async fn create<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<StockSnapshot>), ApiError> {
    let snapshot = state.ledger.add_product(
        ProductId::new(req.product_id),
        req.name,
        req.quantity,
        Money::from_cents(req.price_cents),
    )?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /products — list all products.
#[tracing::instrument(skip(state))]
pub async fn list<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
) -> Json<Vec<StockSnapshot>> {
    Json(state.ledger.list())
}

/// GET /products/:id — stock snapshot for one product.
#[tracing::instrument(skip(state))]
pub async fn get<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
) -> Result<Json<StockSnapshot>, ApiError> {
    Ok(Json(state.ledger.get(&ProductId::new(id))?))
}

/// PUT /products/:id — overwrite quantity and/or price.
#[tracing::instrument(skip(state, req))]
pub async fn update<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<Json<StockSnapshot>, ApiError> {
    let snapshot = state.ledger.update(
        &ProductId::new(id),
        req.quantity,
        req.price_cents.map(Money::from_cents),
    )?;
    Ok(Json(snapshot))
}

/// PATCH /products/:id/stock — apply a direct quantity delta.
#[tracing::instrument(skip(state, req))]
pub async fn adjust_stock<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Json<StockSnapshot>, ApiError> {
    let snapshot = state.ledger.adjust(&ProductId::new(id), req.quantity)?;
    Ok(Json(snapshot))
}

/// POST /products/:id/reserve — provisionally allocate units to an order.
#[tracing::instrument(skip(state, req))]
pub async fn reserve<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
    Json(req): Json<ReservationRequest>,
) -> Result<Json<ReserveResponse>, ApiError> {
    let product_id = ProductId::new(id);
    let remaining_available =
        state
            .ledger
            .reserve(&product_id, req.quantity, OrderId::new(req.order_id))?;
    Ok(Json(ReserveResponse {
        product_id,
        order_id: req.order_id,
        quantity: req.quantity,
        remaining_available,
    }))
}

/// POST /products/:id/release — return reserved units to the sellable pool.
#[tracing::instrument(skip(state, req))]
pub async fn release<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
    Json(req): Json<ReservationRequest>,
) -> Result<Json<ReleaseResponse>, ApiError> {
    let product_id = ProductId::new(id);
    let reserved = state
        .ledger
        .release(&product_id, req.quantity, OrderId::new(req.order_id))?;
    Ok(Json(ReleaseResponse {
        product_id,
        order_id: req.order_id,
        quantity: req.quantity,
        reserved,
    }))
}

/// GET /products/low-stock — products at or below the availability threshold.
#[tracing::instrument(skip(state))]
pub async fn low_stock<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(query): Query<LowStockQuery>,
) -> Json<LowStockResponse> {
    let threshold = query.threshold.unwrap_or(20);
    let items = state.ledger.low_stock(threshold);
    Json(LowStockResponse {
        threshold,
        low_stock_count: items.len(),
        items,
    })
}
