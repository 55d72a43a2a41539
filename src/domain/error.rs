use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The gateway accepted the request but declined the payment.
    #[error("payment rejected: {details}")]
    PaymentRejected { details: String },

    /// Transport failure or unexpected gateway response.
    #[error("gateway: {0}")]
    Gateway(String),

    /// Operator fault: credential missing or rejected by the gateway.
    #[error("configuration: {0}")]
    Config(String),

    #[error("order store: {0}")]
    Store(String),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("webhook signature: {0}")]
    WebhookSignature(String),
}
