use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::{
            error::CheckoutError,
            gateway::{GatewayPayment, GatewayStatus, IntentMethod, Payer, PaymentIntent},
            money::Amount,
            order::{Order, OrderStatus, PaymentMethod},
        },
    },
    axum::{Json, extract::State},
    serde::{Deserialize, Serialize},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub amount: Option<Amount>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub card_token: Option<String>,
    #[serde(default)]
    pub installments: Option<u32>,
    #[serde(default)]
    pub payment_method_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub payment_id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boleto_url: Option<String>,
}

/// The gateway wants separate given/family names; checkout collects one
/// field. Naive whitespace split, single-token names duplicate as last.
fn split_name(full: &str) -> (String, String) {
    let mut parts = full.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    let last = if rest.is_empty() { first.clone() } else { rest };
    (first, last)
}

fn payment_description(order_id: &str) -> String {
    let short: String = order_id.chars().take(8).collect::<String>().to_uppercase();
    format!("Pedido #{short} - Brecholaria Vintage")
}

/// Everything that must hold before the gateway is contacted.
fn validated(
    request: &PaymentRequest,
) -> Result<(String, PaymentMethod, Amount, String, IntentMethod), CheckoutError> {
    let order_id = request
        .order_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| CheckoutError::Validation("orderId is required".into()))?;
    let method = request
        .payment_method
        .ok_or_else(|| CheckoutError::Validation("paymentMethod is required".into()))?;
    let amount = request
        .amount
        .ok_or_else(|| CheckoutError::Validation("amount is required".into()))?;
    let email = request
        .customer_email
        .clone()
        .filter(|e| !e.is_empty())
        .ok_or_else(|| CheckoutError::Validation("customerEmail is required".into()))?;

    let intent_method = match method {
        PaymentMethod::Pix => IntentMethod::Pix,
        PaymentMethod::Boleto => IntentMethod::Boleto,
        PaymentMethod::CreditCard => {
            let token = request
                .card_token
                .clone()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| CheckoutError::Validation("cardToken is required".into()))?;
            let payment_method_id = request
                .payment_method_id
                .clone()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| {
                    CheckoutError::Validation("paymentMethodId is required".into())
                })?;
            IntentMethod::CreditCard {
                token,
                installments: request.installments.unwrap_or(1),
                payment_method_id,
            }
        }
    };

    Ok((order_id, method, amount, email, intent_method))
}

fn shape_response(
    method: PaymentMethod,
    payment: GatewayPayment,
) -> PaymentResponse {
    let mut response = PaymentResponse {
        payment_id: payment.id,
        status: payment.status.as_str().to_string(),
        qr_code: None,
        qr_code_base64: None,
        ticket_url: None,
        boleto_url: None,
    };

    match method {
        PaymentMethod::Pix => {
            if let Some(pix) = payment.pix {
                response.qr_code = pix.qr_code;
                response.qr_code_base64 = pix.qr_code_base64;
                response.ticket_url = pix.ticket_url;
            }
        }
        PaymentMethod::Boleto => response.boleto_url = payment.boleto_url,
        PaymentMethod::CreditCard => {}
    }

    response
}

#[tracing::instrument(name = "create_payment", skip_all, fields(order_id = tracing::field::Empty))]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let (order_id, method, amount, email, intent_method) = validated(&request)?;
    tracing::Span::current().record("order_id", tracing::field::display(&order_id));

    let order: Order = state
        .store
        .fetch_order(&order_id)
        .await?
        .ok_or_else(|| CheckoutError::NotFound(format!("order {order_id}")))?;

    // The charge amount comes from the persisted line items, never from
    // the client. A disagreeing request is refused outright.
    let items_total = order.items_total()?;
    if amount != items_total {
        return Err(CheckoutError::Validation(format!(
            "amount {} does not match order total {}",
            amount, items_total
        ))
        .into());
    }

    let (first_name, last_name) =
        split_name(request.customer_name.as_deref().unwrap_or_default());
    let intent = PaymentIntent {
        amount: items_total,
        description: payment_description(&order_id),
        payer: Payer {
            email,
            first_name,
            last_name,
        },
        external_reference: order_id.clone(),
        notification_url: state.notification_url.to_string(),
        method: intent_method,
    };

    let payment = state.gateway.create_payment(intent).await?;

    let order_status = if payment.status == GatewayStatus::Approved {
        OrderStatus::Pago
    } else {
        OrderStatus::Novo
    };
    state
        .store
        .update_status(&order_id, order_status, Some(&payment.id))
        .await?;

    tracing::info!(
        payment_id = %payment.id,
        gateway_status = %payment.status,
        order_status = %order_status,
        method = %method,
        "payment intent created"
    );

    Ok(Json(shape_response(method, payment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_two_tokens() {
        assert_eq!(
            split_name("Ana Souza"),
            ("Ana".to_string(), "Souza".to_string())
        );
    }

    #[test]
    fn split_name_many_tokens_keeps_rest_as_last() {
        assert_eq!(
            split_name("Maria da Silva Santos"),
            ("Maria".to_string(), "da Silva Santos".to_string())
        );
    }

    #[test]
    fn split_name_single_token_duplicates() {
        assert_eq!(split_name("Cher"), ("Cher".to_string(), "Cher".to_string()));
    }

    #[test]
    fn split_name_empty_gives_empty_pair() {
        assert_eq!(split_name("  "), (String::new(), String::new()));
    }

    #[test]
    fn description_truncates_and_uppercases() {
        assert_eq!(
            payment_description("abcdef12-3456-7890"),
            "Pedido #ABCDEF12 - Brecholaria Vintage"
        );
        // Short ids are taken whole.
        assert_eq!(payment_description("ab"), "Pedido #AB - Brecholaria Vintage");
    }
}
