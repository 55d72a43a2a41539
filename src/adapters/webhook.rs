use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::error::CheckoutError,
    },
    axum::{Json, extract::State, http::HeaderMap},
    hmac::{Hmac, Mac},
    serde::{Deserialize, Deserializer},
    sha2::Sha256,
};

type HmacSha256 = Hmac<Sha256>;

/// Gateway notification envelope. Only `type == "payment"` carries work;
/// the payload is a trigger, never a trusted source of payment state.
#[derive(Debug, Deserialize)]
pub struct WebhookNotification {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: Option<NotificationData>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationData {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub id: Option<String>,
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Num(n) => n.to_string(),
        Raw::Text(s) => s,
    }))
}

// ── Signature verification ─────────────────────────────────────────────────
//
// The gateway signs each delivery with a shared secret:
//   x-signature: ts=<unix ts>,v1=<hex hmac-sha256>
// over the manifest `id:<payment id>;request-id:<x-request-id>;ts:<ts>;`
// with the payment id lowercased.

pub fn signature_manifest(payment_id: &str, request_id: &str, ts: &str) -> String {
    format!(
        "id:{};request-id:{request_id};ts:{ts};",
        payment_id.to_lowercase()
    )
}

pub fn sign_manifest(secret: &str, manifest: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(manifest.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, CheckoutError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| CheckoutError::WebhookSignature(format!("missing {name} header")))
}

fn verify_signature(
    secret: &str,
    headers: &HeaderMap,
    payment_id: &str,
) -> Result<(), CheckoutError> {
    let signature = header(headers, "x-signature")?;
    let request_id = header(headers, "x-request-id")?;

    let mut ts = None;
    let mut v1 = None;
    for segment in signature.split(',') {
        match segment.trim().split_once('=') {
            Some(("ts", value)) => ts = Some(value.trim()),
            Some(("v1", value)) => v1 = Some(value.trim()),
            _ => {}
        }
    }
    let ts = ts.ok_or_else(|| CheckoutError::WebhookSignature("missing ts segment".into()))?;
    let v1 = v1.ok_or_else(|| CheckoutError::WebhookSignature("missing v1 segment".into()))?;

    let expected = hex::decode(v1)
        .map_err(|_| CheckoutError::WebhookSignature("v1 is not valid hex".into()))?;

    let manifest = signature_manifest(payment_id, request_id, ts);
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(manifest.as_bytes());
    // Constant-time comparison.
    mac.verify_slice(&expected)
        .map_err(|_| CheckoutError::WebhookSignature("signature mismatch".into()))
}

// ── Handler ────────────────────────────────────────────────────────────────

#[tracing::instrument(
    name = "payment_webhook",
    skip_all,
    fields(payment_id = tracing::field::Empty, order_id = tracing::field::Empty)
)]
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(notification): Json<WebhookNotification>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // Other notification kinds (merchant_order, plan, ...) are out of scope.
    if notification.kind.as_deref() != Some("payment") {
        tracing::debug!(kind = ?notification.kind, "ignoring non-payment notification");
        return Ok(Json(
            serde_json::json!({"message": "notification type not handled"}),
        ));
    }

    let payment_id = notification
        .data
        .and_then(|data| data.id)
        .ok_or_else(|| CheckoutError::Validation("payment id not found in notification".into()))?;
    tracing::Span::current().record("payment_id", tracing::field::display(&payment_id));

    verify_signature(&state.webhook_secret, &headers, &payment_id)?;

    // The notification body is only a trigger; pull authoritative state.
    let payment = state.gateway.fetch_payment(&payment_id).await?;

    let order_id = payment.external_reference.ok_or_else(|| {
        CheckoutError::Validation("payment carries no external reference".into())
    })?;
    tracing::Span::current().record("order_id", tracing::field::display(&order_id));

    let mapped = payment.status.order_status();

    let order = state
        .store
        .fetch_order(&order_id)
        .await?
        .ok_or_else(|| CheckoutError::NotFound(format!("order {order_id}")))?;

    // A late delivery must not regress an order that already moved on
    // (e.g. a "pending" notification landing after "approved" was applied).
    if mapped.rank() < order.status.rank() {
        tracing::info!(
            gateway_status = %payment.status,
            mapped = %mapped,
            current = %order.status,
            "stale notification, keeping current status"
        );
        return Ok(Json(serde_json::json!({
            "message": "stale notification ignored",
            "orderId": order_id,
            "status": order.status.as_str(),
        })));
    }

    state
        .store
        .update_status(&order_id, mapped, Some(&payment.id))
        .await?;

    tracing::info!(gateway_status = %payment.status, status = %mapped, "order status reconciled");
    Ok(Json(serde_json::json!({
        "message": "webhook processed",
        "orderId": order_id,
        "status": mapped.as_str(),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_lowercases_payment_id() {
        assert_eq!(
            signature_manifest("ABC123", "req-1", "1700000000"),
            "id:abc123;request-id:req-1;ts:1700000000;"
        );
    }

    #[test]
    fn verify_accepts_own_signature() {
        let secret = "shhh";
        let manifest = signature_manifest("123", "req-1", "1700000000");
        let v1 = sign_manifest(secret, &manifest);

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-signature",
            format!("ts=1700000000,v1={v1}").parse().unwrap(),
        );
        headers.insert("x-request-id", "req-1".parse().unwrap());

        assert!(verify_signature(secret, &headers, "123").is_ok());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let manifest = signature_manifest("123", "req-1", "1700000000");
        let v1 = sign_manifest("other", &manifest);

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-signature",
            format!("ts=1700000000,v1={v1}").parse().unwrap(),
        );
        headers.insert("x-request-id", "req-1".parse().unwrap());

        assert!(matches!(
            verify_signature("shhh", &headers, "123"),
            Err(CheckoutError::WebhookSignature(_))
        ));
    }

    #[test]
    fn verify_rejects_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            verify_signature("shhh", &headers, "123"),
            Err(CheckoutError::WebhookSignature(_))
        ));
    }

    #[test]
    fn notification_id_accepts_number_and_string() {
        let n: WebhookNotification =
            serde_json::from_value(serde_json::json!({"type": "payment", "data": {"id": 42}}))
                .unwrap();
        assert_eq!(n.data.unwrap().id.as_deref(), Some("42"));

        let n: WebhookNotification =
            serde_json::from_value(serde_json::json!({"type": "payment", "data": {"id": "42"}}))
                .unwrap();
        assert_eq!(n.data.unwrap().id.as_deref(), Some("42"));
    }
}
