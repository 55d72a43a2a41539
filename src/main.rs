use {
    brecholaria::{
        AppState,
        infra::{mercadopago::MercadoPago, supabase::SupabaseOrderStore},
    },
    std::{env, sync::Arc},
    tokio::signal,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let supabase_url = env::var("SUPABASE_URL").expect("SUPABASE_URL must be set");
    let service_key =
        env::var("SUPABASE_SERVICE_ROLE_KEY").expect("SUPABASE_SERVICE_ROLE_KEY must be set");
    let access_token =
        env::var("MERCADOPAGO_ACCESS_TOKEN").expect("MERCADOPAGO_ACCESS_TOKEN must be set");
    let webhook_secret =
        env::var("MERCADOPAGO_WEBHOOK_SECRET").expect("MERCADOPAGO_WEBHOOK_SECRET must be set");
    let public_url = env::var("PUBLIC_URL").expect("PUBLIC_URL must be set");

    let store = SupabaseOrderStore::new(&supabase_url, &service_key)
        .expect("failed to configure order store");
    let gateway =
        MercadoPago::new(&access_token).expect("failed to configure payment gateway");

    let state = AppState {
        store: Arc::new(store),
        gateway: Arc::new(gateway),
        webhook_secret: webhook_secret.into(),
        notification_url: format!("{}/payments/webhook", public_url.trim_end_matches('/')).into(),
    };

    let app = brecholaria::app(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    tracing::info!("listening on 0.0.0.0:3000");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
