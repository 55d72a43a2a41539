use {
    super::error::CheckoutError,
    super::money::Amount,
    super::order::OrderStatus,
    derive_more::Display,
    serde::Deserialize,
    std::{future::Future, pin::Pin},
};

/// Payment status as the gateway reports it. Unrecognized values collapse
/// into `Unknown` rather than failing the whole notification.
#[derive(Debug, Clone, Copy, Display, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GatewayStatus {
    #[display("approved")]
    Approved,
    #[display("pending")]
    Pending,
    #[display("in_process")]
    InProcess,
    #[display("rejected")]
    Rejected,
    #[display("cancelled")]
    Cancelled,
    #[display("refunded")]
    Refunded,
    #[display("charged_back")]
    ChargedBack,
    #[serde(other)]
    #[display("unknown")]
    Unknown,
}

impl GatewayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::InProcess => "in_process",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
            Self::Refunded => "refunded",
            Self::ChargedBack => "charged_back",
            Self::Unknown => "unknown",
        }
    }

    /// The reconciliation table: gateway payment status → local order status.
    pub fn order_status(&self) -> OrderStatus {
        match self {
            Self::Approved => OrderStatus::Pago,
            Self::Pending | Self::InProcess => OrderStatus::Novo,
            Self::Rejected | Self::Cancelled => OrderStatus::Cancelado,
            Self::Refunded | Self::ChargedBack => OrderStatus::Cancelado,
            Self::Unknown => OrderStatus::Novo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Method-specific part of a payment intent. The gateway wants a flat
/// `payment_method_id` plus card fields; the adapter flattens this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentMethod {
    Pix,
    CreditCard {
        token: String,
        installments: u32,
        payment_method_id: String,
    },
    Boleto,
}

/// One checkout request translated for the gateway. `external_reference`
/// carries the order id so the webhook can correlate back.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentIntent {
    pub amount: Amount,
    pub description: String,
    pub payer: Payer,
    pub external_reference: String,
    pub notification_url: String,
    pub method: IntentMethod,
}

/// PIX transaction data returned on intent creation. All fields are
/// optional on the gateway side; the response echoes what arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixTransaction {
    pub qr_code: Option<String>,
    pub qr_code_base64: Option<String>,
    pub ticket_url: Option<String>,
}

/// What the handlers get back from the gateway, both on intent creation
/// and on a webhook-triggered re-fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayPayment {
    pub id: String,
    pub status: GatewayStatus,
    pub external_reference: Option<String>,
    pub pix: Option<PixTransaction>,
    pub boleto_url: Option<String>,
}

pub type GatewayFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, CheckoutError>> + Send + 'a>>;

pub trait PaymentGateway: Send + Sync {
    fn create_payment(&self, intent: PaymentIntent) -> GatewayFuture<'_, GatewayPayment>;

    fn fetch_payment(&self, id: &str) -> GatewayFuture<'_, GatewayPayment>;
}
