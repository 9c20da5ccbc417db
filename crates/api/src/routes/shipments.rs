//! Shipment lifecycle and estimation endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::OrderId;
use payments::PaymentGateway;
use serde::Deserialize;
use shipping::{CarrierEstimate, Shipment, ShipmentStatus, TrackingView};

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreateShipmentRequest {
    pub order_id: u64,
    pub recipient: String,
    pub address: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListShipmentsQuery {
    pub status: Option<String>,
    pub order_id: Option<u64>,
}

#[derive(Deserialize)]
pub struct UpdateShipmentRequest {
    pub status: String,
    pub location: Option<String>,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct EstimateRequest {
    pub weight_kg: f64,
}

/// POST /shipments — create a shipment for an order.
#[tracing::instrument(skip(state, req))]
pub async fn create<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<CreateShipmentRequest>,
) -> Result<(StatusCode, Json<Shipment>), ApiError> {
    let shipment = state.shipping.create(
        OrderId::new(req.order_id),
        req.recipient,
        req.address,
        req.items,
    )?;
    Ok((StatusCode::CREATED, Json(shipment)))
}

/// GET /shipments — list shipments, optionally filtered.
#[tracing::instrument(skip(state))]
pub async fn list<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(query): Query<ListShipmentsQuery>,
) -> Result<Json<Vec<Shipment>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ShipmentStatus>)
        .transpose()?;
    let order_id = query.order_id.map(OrderId::new);
    Ok(Json(state.shipping.list(status, order_id)))
}

/// GET /shipments/:id — load a shipment by ID.
#[tracing::instrument(skip(state))]
pub async fn get<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
) -> Result<Json<Shipment>, ApiError> {
    Ok(Json(state.shipping.get(&id)?))
}

/// GET /shipments/:id/track — tracking view with full history.
#[tracing::instrument(skip(state))]
pub async fn track<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
) -> Result<Json<TrackingView>, ApiError> {
    Ok(Json(state.shipping.track(&id)?))
}

/// PUT /shipments/:id/status — set status and append a history entry.
#[tracing::instrument(skip(state, req))]
pub async fn update_status<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateShipmentRequest>,
) -> Result<Json<Shipment>, ApiError> {
    let status: ShipmentStatus = req.status.parse()?;
    let shipment = state
        .shipping
        .update_status(&id, status, req.location, req.note)?;
    Ok(Json(shipment))
}

/// DELETE /shipments/:id — cancel a shipment still in the warehouse.
#[tracing::instrument(skip(state))]
pub async fn cancel<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Path(id): Path<String>,
) -> Result<Json<Shipment>, ApiError> {
    Ok(Json(state.shipping.cancel(&id)?))
}

/// POST /shipments/estimate — per-carrier cost and delivery quotes.
#[tracing::instrument(skip(state, req))]
pub async fn estimate<G: PaymentGateway + Clone + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<Vec<CarrierEstimate>>, ApiError> {
    Ok(Json(state.shipping.estimate(req.weight_kg)?))
}
