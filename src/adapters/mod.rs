pub mod api_errors;
pub mod orders;
pub mod payments;
pub mod webhook;
