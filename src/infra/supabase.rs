use {
    crate::domain::{
        error::CheckoutError,
        order::{NewOrder, Order, OrderStatus},
        store::{OrderStore, StoreFuture},
    },
    std::sync::Arc,
};

/// Order store backed by Supabase's PostgREST surface. The service-role
/// key goes out both as `apikey` and as the bearer token, which bypasses
/// row-level security the same way the original edge functions did.
pub struct SupabaseOrderStore {
    http: reqwest::Client,
    base_url: String,
    service_key: Arc<str>,
}

impl SupabaseOrderStore {
    pub fn new(base_url: &str, service_key: &str) -> Result<Self, CheckoutError> {
        if service_key.trim().is_empty() {
            return Err(CheckoutError::Config(
                "Supabase service key is not configured".into(),
            ));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        })
    }

    fn orders_url(&self) -> String {
        format!("{}/rest/v1/orders", self.base_url)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", self.service_key.as_ref())
            .bearer_auth(&self.service_key)
    }

    async fn rows(&self, response: reqwest::Response, op: &str) -> Result<Vec<Order>, CheckoutError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckoutError::Store(format!("{op} returned {status}: {body}")));
        }
        response
            .json()
            .await
            .map_err(|e| CheckoutError::Store(format!("{op} returned malformed rows: {e}")))
    }

    async fn insert_inner(&self, order: NewOrder) -> Result<Order, CheckoutError> {
        order.validate()?;

        // New orders always start at `novo`; the column is not part of NewOrder.
        let mut row = serde_json::to_value(&order)?;
        row["status"] = serde_json::Value::String(OrderStatus::Novo.as_str().into());

        let response = self
            .request(reqwest::Method::POST, self.orders_url())
            .header("Prefer", "return=representation")
            .json(&serde_json::json!([row]))
            .send()
            .await
            .map_err(|e| CheckoutError::Store(format!("insert failed: {e}")))?;

        let mut rows = self.rows(response, "insert").await?;
        rows.pop()
            .ok_or_else(|| CheckoutError::Store("insert returned no row".into()))
    }

    async fn fetch_inner(&self, id: &str) -> Result<Option<Order>, CheckoutError> {
        // The id is attached via `.query` so reqwest percent-encodes it; a
        // raw format! here would let an id containing `&` smuggle extra
        // PostgREST filters into the request.
        let id_filter = format!("eq.{id}");
        let response = self
            .request(reqwest::Method::GET, self.orders_url())
            .query(&[("select", "*"), ("id", id_filter.as_str())])
            .send()
            .await
            .map_err(|e| CheckoutError::Store(format!("fetch failed: {e}")))?;

        let mut rows = self.rows(response, "fetch").await?;
        Ok(rows.pop())
    }

    async fn list_inner(&self) -> Result<Vec<Order>, CheckoutError> {
        let response = self
            .request(reqwest::Method::GET, self.orders_url())
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await
            .map_err(|e| CheckoutError::Store(format!("list failed: {e}")))?;

        self.rows(response, "list").await
    }

    async fn update_inner(
        &self,
        id: &str,
        status: OrderStatus,
        payment_id: Option<&str>,
    ) -> Result<Order, CheckoutError> {
        let mut patch = serde_json::json!({ "status": status.as_str() });
        if let Some(payment_id) = payment_id {
            patch["payment_id"] = serde_json::Value::String(payment_id.to_string());
        }

        let id_filter = format!("eq.{id}");
        let response = self
            .request(reqwest::Method::PATCH, self.orders_url())
            .query(&[("id", id_filter.as_str())])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await
            .map_err(|e| CheckoutError::Store(format!("update failed: {e}")))?;

        let mut rows = self.rows(response, "update").await?;
        rows.pop()
            .ok_or_else(|| CheckoutError::NotFound(format!("order {id}")))
    }

    async fn delete_inner(&self, id: &str) -> Result<(), CheckoutError> {
        let id_filter = format!("eq.{id}");
        let response = self
            .request(reqwest::Method::DELETE, self.orders_url())
            .query(&[("id", id_filter.as_str())])
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(|e| CheckoutError::Store(format!("delete failed: {e}")))?;

        let rows = self.rows(response, "delete").await?;
        if rows.is_empty() {
            return Err(CheckoutError::NotFound(format!("order {id}")));
        }
        Ok(())
    }
}

impl OrderStore for SupabaseOrderStore {
    fn insert_order(&self, order: NewOrder) -> StoreFuture<'_, Order> {
        Box::pin(async move { self.insert_inner(order).await })
    }

    fn fetch_order(&self, id: &str) -> StoreFuture<'_, Option<Order>> {
        let id = id.to_string();
        Box::pin(async move { self.fetch_inner(&id).await })
    }

    fn list_orders(&self) -> StoreFuture<'_, Vec<Order>> {
        Box::pin(async move { self.list_inner().await })
    }

    fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        payment_id: Option<&str>,
    ) -> StoreFuture<'_, Order> {
        let id = id.to_string();
        let payment_id = payment_id.map(str::to_string);
        Box::pin(async move { self.update_inner(&id, status, payment_id.as_deref()).await })
    }

    fn delete_order(&self, id: &str) -> StoreFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move { self.delete_inner(&id).await })
    }
}
