pub mod adapters;
pub mod domain;
pub mod infra;

use {
    crate::domain::{gateway::PaymentGateway, store::OrderStore},
    axum::{
        Router,
        extract::DefaultBodyLimit,
        routing::{get, patch, post},
    },
    std::sync::Arc,
    tower_http::cors::CorsLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub webhook_secret: Arc<str>,
    /// Public callback URL handed to the gateway on every intent.
    pub notification_url: Arc<str>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "ok" }))
        .route(
            "/orders",
            post(adapters::orders::create_order).get(adapters::orders::list_orders),
        )
        .route(
            "/orders/{id}",
            get(adapters::orders::get_order).delete(adapters::orders::delete_order),
        )
        .route("/orders/{id}/status", patch(adapters::orders::update_status))
        .route("/payments", post(adapters::payments::create_payment))
        .route("/payments/webhook", post(adapters::webhook::payment_webhook))
        // The storefront is served from another origin; preflights must pass.
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(64 * 1024)) // 64 KB, order payloads are small
        .with_state(state)
}
