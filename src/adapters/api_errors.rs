use crate::domain::error::CheckoutError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Newtype over the domain error so the HTTP shaping lives in the
/// adapter layer. Bodies follow the storefront contract:
/// `{"error": ...}` plus `"details"` when the gateway supplied one.
pub struct ApiError(pub CheckoutError);

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self.0 {
            CheckoutError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            CheckoutError::NotFound(what) => {
                (StatusCode::NOT_FOUND, format!("{what} not found"), None)
            }
            CheckoutError::PaymentRejected { details } => (
                StatusCode::BAD_REQUEST,
                "payment was rejected by the gateway".to_string(),
                Some(details),
            ),
            CheckoutError::WebhookSignature(msg) => {
                tracing::warn!("webhook signature rejected: {msg}");
                (
                    StatusCode::BAD_REQUEST,
                    "invalid webhook signature".to_string(),
                    None,
                )
            }
            CheckoutError::Config(msg) => {
                tracing::error!("configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "payment configuration is not available".to_string(),
                    None,
                )
            }
            CheckoutError::Gateway(msg) => {
                tracing::error!("gateway error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to reach the payment gateway".to_string(),
                    None,
                )
            }
            CheckoutError::Store(msg) => {
                tracing::error!("order store error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to update order".to_string(),
                    None,
                )
            }
            CheckoutError::Serialization(err) => {
                tracing::error!("serialization error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                    None,
                )
            }
        };

        let mut body = serde_json::json!({ "error": error });
        if let Some(details) = details {
            body["details"] = serde_json::Value::String(details);
        }

        (status, Json(body)).into_response()
    }
}
