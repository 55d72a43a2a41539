use {
    crate::domain::{
        error::CheckoutError,
        gateway::{
            GatewayFuture, GatewayPayment, GatewayStatus, IntentMethod, PaymentGateway,
            PaymentIntent, PixTransaction,
        },
    },
    serde::{Deserialize, Deserializer, Serialize},
    std::sync::Arc,
};

const DEFAULT_BASE_URL: &str = "https://api.mercadopago.com";

/// Fixed gateway method id used for boleto intents.
const BOLETO_METHOD_ID: &str = "bolbradesco";

pub struct MercadoPago {
    http: reqwest::Client,
    base_url: String,
    access_token: Arc<str>,
}

impl MercadoPago {
    pub fn new(access_token: &str) -> Result<Self, CheckoutError> {
        Self::with_base_url(access_token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(access_token: &str, base_url: &str) -> Result<Self, CheckoutError> {
        if access_token.trim().is_empty() {
            return Err(CheckoutError::Config(
                "Mercado Pago access token is not configured".into(),
            ));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    async fn create_inner(&self, intent: PaymentIntent) -> Result<GatewayPayment, CheckoutError> {
        let body = MpPaymentRequest::from_intent(&intent);
        let response = self
            .http
            .post(format!("{}/v1/payments", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| CheckoutError::Gateway(format!("payment request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(CheckoutError::Config(
                "gateway rejected the configured credential".into(),
            ));
        }
        if !status.is_success() {
            let error: MpErrorBody = response.json().await.unwrap_or_default();
            return Err(CheckoutError::PaymentRejected {
                details: error.detail(),
            });
        }

        let payment: MpPayment = response
            .json()
            .await
            .map_err(|e| CheckoutError::Gateway(format!("invalid payment response: {e}")))?;
        Ok(payment.into_domain())
    }

    async fn fetch_inner(&self, id: &str) -> Result<GatewayPayment, CheckoutError> {
        let response = self
            .http
            .get(format!("{}/v1/payments/{id}", self.base_url))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| CheckoutError::Gateway(format!("payment fetch failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(CheckoutError::Config(
                "gateway rejected the configured credential".into(),
            ));
        }
        if !status.is_success() {
            return Err(CheckoutError::Gateway(format!(
                "payment fetch for {id} returned {status}"
            )));
        }

        let payment: MpPayment = response
            .json()
            .await
            .map_err(|e| CheckoutError::Gateway(format!("invalid payment response: {e}")))?;
        Ok(payment.into_domain())
    }
}

impl PaymentGateway for MercadoPago {
    fn create_payment(&self, intent: PaymentIntent) -> GatewayFuture<'_, GatewayPayment> {
        Box::pin(async move { self.create_inner(intent).await })
    }

    fn fetch_payment(&self, id: &str) -> GatewayFuture<'_, GatewayPayment> {
        let id = id.to_string();
        Box::pin(async move { self.fetch_inner(&id).await })
    }
}

// ── Wire types ─────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MpPayer<'a> {
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
}

#[derive(Debug, Serialize)]
struct MpPaymentRequest<'a> {
    transaction_amount: f64,
    description: &'a str,
    payer: MpPayer<'a>,
    external_reference: &'a str,
    notification_url: &'a str,
    payment_method_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    installments: Option<u32>,
}

impl<'a> MpPaymentRequest<'a> {
    fn from_intent(intent: &'a PaymentIntent) -> Self {
        let (payment_method_id, token, installments) = match &intent.method {
            IntentMethod::Pix => ("pix", None, None),
            IntentMethod::CreditCard {
                token,
                installments,
                payment_method_id,
            } => (
                payment_method_id.as_str(),
                Some(token.as_str()),
                Some(*installments),
            ),
            IntentMethod::Boleto => (BOLETO_METHOD_ID, None, None),
        };

        Self {
            transaction_amount: intent.amount.reais(),
            description: &intent.description,
            payer: MpPayer {
                email: &intent.payer.email,
                first_name: &intent.payer.first_name,
                last_name: &intent.payer.last_name,
            },
            external_reference: &intent.external_reference,
            notification_url: &intent.notification_url,
            payment_method_id,
            token,
            installments,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MpTransactionData {
    #[serde(default)]
    qr_code: Option<String>,
    #[serde(default)]
    qr_code_base64: Option<String>,
    #[serde(default)]
    ticket_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MpPointOfInteraction {
    #[serde(default)]
    transaction_data: Option<MpTransactionData>,
}

#[derive(Debug, Deserialize)]
struct MpTransactionDetails {
    #[serde(default)]
    external_resource_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MpPayment {
    #[serde(deserialize_with = "string_or_number")]
    id: String,
    status: GatewayStatus,
    #[serde(default)]
    external_reference: Option<String>,
    #[serde(default)]
    point_of_interaction: Option<MpPointOfInteraction>,
    #[serde(default)]
    transaction_details: Option<MpTransactionDetails>,
}

impl MpPayment {
    fn into_domain(self) -> GatewayPayment {
        let pix = self
            .point_of_interaction
            .and_then(|poi| poi.transaction_data)
            .map(|data| PixTransaction {
                qr_code: data.qr_code,
                qr_code_base64: data.qr_code_base64,
                ticket_url: data.ticket_url,
            });
        let boleto_url = self
            .transaction_details
            .and_then(|details| details.external_resource_url);

        GatewayPayment {
            id: self.id,
            status: self.status,
            external_reference: self.external_reference,
            pix,
            boleto_url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct MpCause {
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MpErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    cause: Vec<MpCause>,
}

impl MpErrorBody {
    fn detail(self) -> String {
        self.message
            .or_else(|| self.cause.into_iter().find_map(|c| c.description))
            .unwrap_or_else(|| "unknown gateway error".into())
    }
}

/// The gateway sends payment ids as a JSON number on the REST API and as a
/// string inside webhook envelopes. Accept both.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n.to_string()),
        Raw::Text(s) => Ok(s),
    }
}
