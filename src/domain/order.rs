use {
    super::error::CheckoutError,
    super::money::Amount,
    chrono::{DateTime, Utc},
    derive_more::Display,
    serde::{Deserialize, Serialize},
};

/// Order lifecycle status, stored and serialized in Portuguese: the
/// storefront admin panel and the database both speak these values.
#[derive(Debug, Clone, Copy, Display, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[display("novo")]
    Novo,
    #[display("pago")]
    Pago,
    #[display("enviado")]
    Enviado,
    #[display("concluido")]
    Concluido,
    #[display("cancelado")]
    Cancelado,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Novo => "novo",
            Self::Pago => "pago",
            Self::Enviado => "enviado",
            Self::Concluido => "concluido",
            Self::Cancelado => "cancelado",
        }
    }

    /// Lifecycle rank, higher means further along. Used to keep a late
    /// webhook delivery from regressing an order that already moved on.
    /// `Pago` and `Cancelado` share a rank: a refund may cancel a paid
    /// order, and a retried payment may revive a cancelled one.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Novo => 0,
            Self::Pago | Self::Cancelado => 1,
            Self::Enviado => 2,
            Self::Concluido => 3,
        }
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = CheckoutError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "novo" => Ok(Self::Novo),
            "pago" => Ok(Self::Pago),
            "enviado" => Ok(Self::Enviado),
            "concluido" => Ok(Self::Concluido),
            "cancelado" => Ok(Self::Cancelado),
            other => Err(CheckoutError::Validation(format!(
                "unknown order status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Display, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[display("pix")]
    Pix,
    #[display("credit_card")]
    CreditCard,
    #[display("boleto")]
    Boleto,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::CreditCard => "credit_card",
            Self::Boleto => "boleto",
        }
    }
}

/// Delivery address as the checkout form ships it. `zipCode` keeps its
/// camelCase spelling; that is how the rows were written historically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderAddress {
    pub street: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "zipCode")]
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub price: Amount,
    pub quantity: u32,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> Result<Amount, CheckoutError> {
        self.price
            .checked_mul(self.quantity)
            .ok_or_else(|| CheckoutError::Validation("line total overflow".into()))
    }
}

/// Full order row from the store (for reads). Field names match the
/// storage columns, which are also the wire format of the orders API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_address: Option<OrderAddress>,
    pub items: Vec<OrderItem>,
    pub total: Amount,
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of unit price × quantity across line items. The client-supplied
    /// `total` column is never trusted for charging; this is.
    pub fn items_total(&self) -> Result<Amount, CheckoutError> {
        let mut sum = Amount::new(0)?;
        for item in &self.items {
            sum = sum
                .checked_add(item.line_total()?)
                .ok_or_else(|| CheckoutError::Validation("order total overflow".into()))?;
        }
        Ok(sum)
    }
}

/// Payload for insertion; id and timestamps are owned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_address: Option<OrderAddress>,
    pub items: Vec<OrderItem>,
    pub total: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

impl NewOrder {
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.customer_name.trim().is_empty() {
            return Err(CheckoutError::Validation("customer_name is required".into()));
        }
        if self.customer_email.trim().is_empty() {
            return Err(CheckoutError::Validation("customer_email is required".into()));
        }
        if self.items.is_empty() {
            return Err(CheckoutError::Validation("order has no items".into()));
        }
        if let Some(addr) = &self.customer_address {
            if addr.state.len() != 2 {
                return Err(CheckoutError::Validation(format!(
                    "state must be a 2-letter code, got: {}",
                    addr.state
                )));
            }
        }
        Ok(())
    }
}
