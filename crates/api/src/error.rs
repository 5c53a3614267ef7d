//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{OrderError, PricingError};
use reconciliation::PlacementError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Placement or status update failure.
    Placement(PlacementError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Placement(err) => placement_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn placement_error_to_response(err: PlacementError) -> (StatusCode, String) {
    let status = match &err {
        PlacementError::Pricing(PricingError::UnknownProduct(_))
        | PlacementError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        PlacementError::Pricing(PricingError::InsufficientInventory { .. })
        | PlacementError::Order(OrderError::InvalidTransition { .. }) => StatusCode::CONFLICT,
        PlacementError::Order(OrderError::InvalidStatus(_))
        | PlacementError::Order(OrderError::InvalidQuantity { .. })
        | PlacementError::Pricing(PricingError::ValueOverflow { .. }) => StatusCode::BAD_REQUEST,
        PlacementError::CatalogUnavailable(_)
        | PlacementError::CatalogUpdateFailed(_)
        | PlacementError::InvariantViolation { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

impl From<PlacementError> for ApiError {
    fn from(err: PlacementError) -> Self {
        ApiError::Placement(err)
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        ApiError::Placement(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}
