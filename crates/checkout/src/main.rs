//! Purchase simulator: seeds a small catalog and races concurrent buyers
//! through the purchase service.
//!
//! Set `PAYMENT_PROVIDER=MOCK` to skip the bank gateway's audit log; the
//! variable is consulted once per purchase, so it can change mid-run.

use std::sync::Arc;
use std::thread;

use anyhow::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tienda_catalog::Book;
use tienda_checkout::{PurchaseRequest, PurchaseService};
use tienda_core::BookId;
use tienda_infra::MemoryStore;
use tienda_payment::gateway_from_env;

fn seed(store: &MemoryStore, title: &str, price: Decimal, stock: u32) -> BookId {
    let book = Book::new(title, price);
    let id = book.id;
    store.insert_book(book);
    store.set_stock(id, stock);
    id
}

fn main() -> Result<()> {
    tienda_observability::init();

    let store = Arc::new(MemoryStore::new());
    let clean_code = seed(&store, "Clean Code en Python", dec!(150.00), 10);
    let pragmatic = seed(&store, "The Pragmatic Programmer", dec!(120.00), 6);
    let ddd = seed(&store, "Domain-Driven Design", dec!(200.00), 4);

    tracing::info!(books = store.books().len(), "catalog seeded");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let basket = match i % 4 {
                    0 => vec![clean_code],
                    1 => vec![clean_code, pragmatic],
                    2 => vec![pragmatic, ddd, clean_code],
                    _ => vec![ddd, clean_code, clean_code],
                };
                let request = PurchaseRequest {
                    user: format!("buyer-{i}"),
                    products: basket,
                    shipping_address: "Calle 123".to_string(),
                };

                // Fresh gateway per purchase: the provider switch is live.
                let service = PurchaseService::new(Arc::clone(&store), gateway_from_env());
                match service.execute_purchase(&request) {
                    Ok(message) => tracing::info!(buyer = i, %message, "purchase ok"),
                    Err(e) => tracing::warn!(buyer = i, error = %e, "purchase failed"),
                }
            })
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow::anyhow!("buyer thread panicked"))?;
    }

    for book in store.books() {
        tracing::info!(
            title = %book.title,
            stock = store.stock_on_hand(&book.id).unwrap_or(0),
            "final stock"
        );
    }
    let revenue: Decimal = store.orders().iter().map(|o| o.total).sum();
    tracing::info!(orders = store.order_count(), %revenue, "simulation finished");

    Ok(())
}
