//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orders::OrderError;
use payments::PaymentError;
use shipping::ShippingError;
use stock::StockError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// A dependent service is unreachable.
    Upstream(String),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(msg) => {
                tracing::warn!(error = %msg, "upstream unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, msg)
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<StockError> for ApiError {
    fn from(err: StockError) -> Self {
        match &err {
            StockError::NotFound(_) => ApiError::NotFound(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match &err {
            OrderError::NotFound(_) | OrderError::ProductNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            OrderError::Upstream(_) => ApiError::Upstream(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match &err {
            PaymentError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PaymentError::InvalidTransition { .. } => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<ShippingError> for ApiError {
    fn from(err: ShippingError) -> Self {
        match &err {
            ShippingError::NotFound(_) => ApiError::NotFound(err.to_string()),
            _ => ApiError::BadRequest(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ProductId;

    #[test]
    fn stock_not_found_maps_to_404() {
        let err: ApiError = StockError::NotFound(ProductId::new("PROD-404")).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn insufficient_stock_maps_to_400() {
        let err: ApiError = OrderError::InsufficientStock {
            available: 2,
            requested: 5,
        }
        .into();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn upstream_failure_maps_to_503() {
        let err: ApiError = OrderError::Upstream("connection refused".to_string()).into();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
