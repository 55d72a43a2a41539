pub mod error;
pub mod gateway;
pub mod money;
pub mod order;
pub mod store;
