use {
    crate::{
        AppState,
        adapters::api_errors::ApiError,
        domain::{
            error::CheckoutError,
            order::{NewOrder, Order, OrderStatus},
        },
    },
    axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
    },
    serde::Deserialize,
};

pub async fn create_order(
    State(state): State<AppState>,
    Json(order): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let stored = state.store.insert_order(order).await?;
    tracing::info!(order_id = %stored.id, total = %stored.total, "order created");
    Ok((StatusCode::CREATED, Json(stored)))
}

pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.store.list_orders().await?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .store
        .fetch_order(&id)
        .await?
        .ok_or_else(|| CheckoutError::NotFound(format!("order {id}")))?;
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_id: Option<String>,
}

/// Admin-driven status edit. Unconditional: the admin may move an order
/// to any status, including backwards.
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .store
        .update_status(&id, update.status, update.payment_id.as_deref())
        .await?;
    tracing::info!(order_id = %id, status = %update.status, "order status updated");
    Ok(Json(order))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_order(&id).await?;
    tracing::info!(order_id = %id, "order deleted");
    Ok(StatusCode::NO_CONTENT)
}
