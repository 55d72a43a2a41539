use {
    crate::domain::{
        error::CheckoutError,
        order::{NewOrder, Order, OrderStatus},
        store::{OrderStore, StoreFuture},
    },
    chrono::Utc,
    std::collections::HashMap,
    std::sync::Mutex,
    uuid::Uuid,
};

/// Order store held in process memory. Used by the test suite and for
/// running the service locally without a Supabase project.
#[derive(Default)]
pub struct InMemoryOrderStore {
    orders: Mutex<HashMap<String, Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an order directly, bypassing insert semantics. Test hook.
    pub fn put(&self, order: Order) {
        self.orders
            .lock()
            .expect("order map poisoned")
            .insert(order.id.clone(), order);
    }
}

impl OrderStore for InMemoryOrderStore {
    fn insert_order(&self, order: NewOrder) -> StoreFuture<'_, Order> {
        Box::pin(async move {
            order.validate()?;
            let now = Utc::now();
            let stored = Order {
                id: Uuid::now_v7().to_string(),
                customer_name: order.customer_name,
                customer_email: order.customer_email,
                customer_phone: order.customer_phone,
                customer_address: order.customer_address,
                items: order.items,
                total: order.total,
                status: OrderStatus::Novo,
                payment_method: order.payment_method,
                payment_id: None,
                created_at: now,
                updated_at: now,
            };
            self.orders
                .lock()
                .expect("order map poisoned")
                .insert(stored.id.clone(), stored.clone());
            Ok(stored)
        })
    }

    fn fetch_order(&self, id: &str) -> StoreFuture<'_, Option<Order>> {
        let id = id.to_string();
        Box::pin(async move {
            Ok(self
                .orders
                .lock()
                .expect("order map poisoned")
                .get(&id)
                .cloned())
        })
    }

    fn list_orders(&self) -> StoreFuture<'_, Vec<Order>> {
        Box::pin(async move {
            let mut orders: Vec<Order> = self
                .orders
                .lock()
                .expect("order map poisoned")
                .values()
                .cloned()
                .collect();
            orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(orders)
        })
    }

    fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        payment_id: Option<&str>,
    ) -> StoreFuture<'_, Order> {
        let id = id.to_string();
        let payment_id = payment_id.map(str::to_string);
        Box::pin(async move {
            let mut orders = self.orders.lock().expect("order map poisoned");
            let order = orders
                .get_mut(&id)
                .ok_or_else(|| CheckoutError::NotFound(format!("order {id}")))?;
            order.status = status;
            if let Some(payment_id) = payment_id {
                order.payment_id = Some(payment_id);
            }
            order.updated_at = Utc::now();
            Ok(order.clone())
        })
    }

    fn delete_order(&self, id: &str) -> StoreFuture<'_, ()> {
        let id = id.to_string();
        Box::pin(async move {
            self.orders
                .lock()
                .expect("order map poisoned")
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| CheckoutError::NotFound(format!("order {id}")))
        })
    }
}
