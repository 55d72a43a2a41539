pub mod memory;
pub mod mercadopago;
pub mod supabase;
