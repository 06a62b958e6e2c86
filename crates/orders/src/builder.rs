use rust_decimal::Decimal;

use tienda_catalog::Book;
use tienda_core::{DomainError, DomainResult, tax};

use crate::order::Order;

/// Fluent accumulator for an order.
///
/// Every setter overwrites the previous value (last-write-wins, not
/// additive). `build` consumes the builder, so state can never leak into the
/// next purchase; use a fresh builder per order.
///
/// The builder produces the order *value*; persisting it is the
/// transaction's job, which keeps creation and deletion under one unit of
/// work.
#[derive(Debug, Default)]
pub struct OrderBuilder {
    user: String,
    products: Vec<Book>,
    shipping_address: String,
}

impl OrderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// The full product list of the request; duplicates are distinct units
    /// and each one counts toward the total.
    pub fn products(mut self, products: Vec<Book>) -> Self {
        self.products = products;
        self
    }

    pub fn shipping_address(mut self, address: impl Into<String>) -> Self {
        self.shipping_address = address.into();
        self
    }

    /// Validate and produce the order with its taxed total.
    pub fn build(self) -> DomainResult<Order> {
        if self.user.trim().is_empty() || self.products.is_empty() {
            return Err(DomainError::validation(
                "an order needs a user and at least one product",
            ));
        }

        let subtotal: Decimal = self.products.iter().map(|b| b.unit_price).sum();
        Ok(Order::new(
            self.user,
            self.shipping_address,
            tax::with_tax(subtotal),
        ))
    }
}
