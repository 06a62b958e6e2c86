//! `tienda-infra` — the shared inventory/order store.
//!
//! The one concurrency-critical contract lives here: a transaction locks the
//! inventory rows it will touch, in ascending `BookId` order, and holds those
//! locks until commit or rollback. Everything else is bookkeeping.

pub mod memory;
mod row_locks;

pub use memory::{MemoryStore, StockTransaction, StoreError};
