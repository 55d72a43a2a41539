use {
    super::error::CheckoutError,
    super::order::{NewOrder, Order, OrderStatus},
    std::{future::Future, pin::Pin},
};

pub type StoreFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, CheckoutError>> + Send + 'a>>;

/// Seam over the managed order storage. The production implementation
/// talks PostgREST; tests run against the in-memory one.
pub trait OrderStore: Send + Sync {
    /// Persist a new order with status `novo`. The store assigns the id
    /// and both timestamps.
    fn insert_order(&self, order: NewOrder) -> StoreFuture<'_, Order>;

    fn fetch_order(&self, id: &str) -> StoreFuture<'_, Option<Order>>;

    /// All orders, newest first, for the admin table view.
    fn list_orders(&self) -> StoreFuture<'_, Vec<Order>>;

    /// Overwrite status and, when given, payment_id. Last writer wins;
    /// callers that care about ordering check ranks before calling.
    fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        payment_id: Option<&str>,
    ) -> StoreFuture<'_, Order>;

    fn delete_order(&self, id: &str) -> StoreFuture<'_, ()>;
}
