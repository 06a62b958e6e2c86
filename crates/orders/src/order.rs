use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tienda_core::{BookId, OrderId};

/// Default user recorded by the legacy quick-purchase path.
pub const GUEST_USER: &str = "guest";

/// Default shipping address recorded by the legacy quick-purchase path.
pub const LOCAL_ADDRESS: &str = "local pickup";

/// A persisted order.
///
/// The multi-item path tracks quantities only through the request's product
/// list; line items are not persisted individually, just the aggregate total.
/// `book_id` is the legacy single-item reference and stays `None` for baskets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub book_id: Option<BookId>,
    pub user: String,
    pub shipping_address: String,
    /// Taxed total, two fractional digits.
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Order produced by the multi-item builder path.
    pub fn new(user: impl Into<String>, shipping_address: impl Into<String>, total: Decimal) -> Self {
        Self {
            id: OrderId::new(),
            book_id: None,
            user: user.into(),
            shipping_address: shipping_address.into(),
            total,
            created_at: Utc::now(),
        }
    }

    /// Order produced by the legacy quick-purchase path: a single book,
    /// guest defaults for user and address.
    pub fn quick(book_id: BookId, total: Decimal) -> Self {
        Self {
            id: OrderId::new(),
            book_id: Some(book_id),
            user: GUEST_USER.to_string(),
            shipping_address: LOCAL_ADDRESS.to_string(),
            total,
            created_at: Utc::now(),
        }
    }
}
