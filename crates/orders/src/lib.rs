//! `tienda-orders` — the persisted order record and its builder.

pub mod builder;
pub mod order;

pub use builder::OrderBuilder;
pub use order::Order;
