use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tienda_core::BookId;

/// A book in the catalog. Immutable once created; repricing means replacing
/// the record, not mutating it under a running purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    /// Unit price in natural decimal form, two fractional digits.
    pub unit_price: Decimal,
}

impl Book {
    pub fn new(title: impl Into<String>, unit_price: Decimal) -> Self {
        Self {
            id: BookId::new(),
            title: title.into(),
            unit_price,
        }
    }
}

/// Stock level for one book (one-to-one with [`Book`]).
///
/// `quantity` is unsigned; the purchase service never stages a decrement past
/// zero, so the non-negative invariant holds by construction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub book_id: BookId,
    pub quantity: u32,
}

impl Inventory {
    pub fn new(book_id: BookId, quantity: u32) -> Self {
        Self { book_id, quantity }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_books_get_distinct_ids() {
        let a = Book::new("Clean Code", dec!(150.00));
        let b = Book::new("Clean Code", dec!(150.00));
        assert_ne!(a.id, b.id);
        assert_eq!(a.unit_price, b.unit_price);
    }
}
