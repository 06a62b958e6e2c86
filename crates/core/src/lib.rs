//! `tienda-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod tax;

pub use error::{DomainError, DomainResult};
pub use id::{BookId, OrderId};
