#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use brecholaria::AppState;
use brecholaria::adapters::webhook::{sign_manifest, signature_manifest};
use brecholaria::domain::error::CheckoutError;
use brecholaria::domain::gateway::{
    GatewayFuture, GatewayPayment, GatewayStatus, PaymentGateway, PaymentIntent, PixTransaction,
};
use brecholaria::domain::money::Amount;
use brecholaria::domain::order::{Order, OrderItem, OrderStatus};
use brecholaria::infra::memory::InMemoryOrderStore;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const WEBHOOK_SECRET: &str = "test-webhook-secret";
pub const NOTIFICATION_URL: &str = "https://shop.example/payments/webhook";

/// What the stub gateway answers to `create_payment`.
pub enum StubCreate {
    Ok(GatewayPayment),
    Rejected(String),
    Unreachable(String),
}

/// Scriptable gateway double. Records every intent and fetch so tests can
/// assert what was (or was not) sent.
#[derive(Default)]
pub struct StubGateway {
    pub create: Mutex<Option<StubCreate>>,
    pub payments: Mutex<HashMap<String, GatewayPayment>>,
    pub intents: Mutex<Vec<PaymentIntent>>,
    pub fetched: Mutex<Vec<String>>,
}

impl StubGateway {
    pub fn answering(create: StubCreate) -> Arc<Self> {
        let stub = Self::default();
        *stub.create.lock().unwrap() = Some(create);
        Arc::new(stub)
    }

    pub fn with_payment(payment: GatewayPayment) -> Arc<Self> {
        let stub = Self::default();
        stub.payments
            .lock()
            .unwrap()
            .insert(payment.id.clone(), payment);
        Arc::new(stub)
    }

    pub fn intent_count(&self) -> usize {
        self.intents.lock().unwrap().len()
    }

    pub fn last_intent(&self) -> PaymentIntent {
        self.intents
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no intent was sent to the gateway")
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }
}

impl PaymentGateway for StubGateway {
    fn create_payment(&self, intent: PaymentIntent) -> GatewayFuture<'_, GatewayPayment> {
        Box::pin(async move {
            self.intents.lock().unwrap().push(intent);
            match &*self.create.lock().unwrap() {
                Some(StubCreate::Ok(payment)) => Ok(payment.clone()),
                Some(StubCreate::Rejected(details)) => Err(CheckoutError::PaymentRejected {
                    details: details.clone(),
                }),
                Some(StubCreate::Unreachable(msg)) => Err(CheckoutError::Gateway(msg.clone())),
                None => Err(CheckoutError::Gateway("stub has no create answer".into())),
            }
        })
    }

    fn fetch_payment(&self, id: &str) -> GatewayFuture<'_, GatewayPayment> {
        let id = id.to_string();
        Box::pin(async move {
            self.fetched.lock().unwrap().push(id.clone());
            self.payments
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| CheckoutError::Gateway(format!("no payment {id} at gateway")))
        })
    }
}

pub fn test_app(store: Arc<InMemoryOrderStore>, gateway: Arc<StubGateway>) -> Router {
    brecholaria::app(AppState {
        store,
        gateway,
        webhook_secret: WEBHOOK_SECRET.into(),
        notification_url: NOTIFICATION_URL.into(),
    })
}

/// An order whose single line item makes up the given total.
pub fn order_with_total(id: &str, centavos: i64) -> Order {
    let now = Utc::now();
    Order {
        id: id.to_string(),
        customer_name: "Ana Souza".into(),
        customer_email: "ana@example.com".into(),
        customer_phone: None,
        customer_address: None,
        items: vec![OrderItem {
            id: "prod-1".into(),
            name: "Vestido floral anos 70".into(),
            price: Amount::new(centavos).unwrap(),
            quantity: 1,
            image: "vestido.jpg".into(),
            size: Some("P".into()),
        }],
        total: Amount::new(centavos).unwrap(),
        status: OrderStatus::Novo,
        payment_method: None,
        payment_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn pix_payment(id: &str, status: GatewayStatus) -> GatewayPayment {
    GatewayPayment {
        id: id.to_string(),
        status,
        external_reference: None,
        pix: Some(PixTransaction {
            qr_code: Some("00020126580014br.gov.bcb.pix".into()),
            qr_code_base64: Some("iVBORw0KGgo=".into()),
            ticket_url: Some("https://gateway.example/pix/ticket".into()),
        }),
        boleto_url: None,
    }
}

pub fn plain_payment(id: &str, status: GatewayStatus, order_id: Option<&str>) -> GatewayPayment {
    GatewayPayment {
        id: id.to_string(),
        status,
        external_reference: order_id.map(str::to_string),
        pix: None,
        boleto_url: None,
    }
}

// ── Request helpers ────────────────────────────────────────────────────────

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST the webhook envelope with a valid gateway signature for `payment_id`.
pub async fn post_webhook(
    app: &Router,
    payment_id: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let ts = "1700000000";
    let request_id = "req-1";
    let v1 = sign_manifest(WEBHOOK_SECRET, &signature_manifest(payment_id, request_id, ts));
    let request = Request::builder()
        .method("POST")
        .uri("/payments/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-signature", format!("ts={ts},v1={v1}"))
        .header("x-request-id", request_id)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, body)
}
