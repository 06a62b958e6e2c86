//! `tienda-catalog` — books and their stock levels.

pub mod book;

pub use book::{Book, Inventory};
