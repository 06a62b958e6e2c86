//! `tienda-checkout` — the purchase transaction service.

pub mod service;

pub use service::{PurchaseRequest, PurchaseService};
