//! Purchase orchestration: lock, validate, build, charge, decrement, commit.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use rust_decimal::Decimal;

use tienda_catalog::Book;
use tienda_core::{BookId, DomainError, DomainResult, tax};
use tienda_infra::MemoryStore;
use tienda_orders::{Order, OrderBuilder};
use tienda_payment::PaymentGateway;

/// What a caller hands the service: who buys, which books (duplicates mean
/// multiple units), where to ship. Not persisted.
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub user: String,
    pub products: Vec<BookId>,
    pub shipping_address: String,
}

/// The purchase transaction service.
///
/// The gateway is injected rather than looked up globally; callers that want
/// per-invocation configuration compose one service per call via
/// [`tienda_payment::gateway_from_env`].
pub struct PurchaseService {
    store: Arc<MemoryStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PurchaseService {
    pub fn new(store: Arc<MemoryStore>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { store, gateway }
    }

    /// Execute a purchase as one atomic unit of work.
    ///
    /// Every inventory row in the basket is locked (ascending id order) and
    /// validated before anything is staged; the basket either fully commits
    /// or leaves inventory and orders untouched.
    pub fn execute_purchase(&self, request: &PurchaseRequest) -> DomainResult<String> {
        if request.products.is_empty() {
            return Err(DomainError::validation(
                "at least one product is required to purchase",
            ));
        }

        // Multiset reduction: occurrences per book.
        let mut quantities: BTreeMap<BookId, u32> = BTreeMap::new();
        for id in &request.products {
            *quantities.entry(*id).or_insert(0) += 1;
        }
        let rows: BTreeSet<BookId> = quantities.keys().copied().collect();

        let mut txn = self.store.begin(rows);

        // Check the whole basket before staging any mutation.
        let mut books: HashMap<BookId, Book> = HashMap::with_capacity(quantities.len());
        for (id, requested) in &quantities {
            let book = txn
                .book(id)
                .ok_or_else(|| DomainError::not_found(format!("book {id}")))?;
            let available = txn.stock_on_hand(id)?.ok_or_else(|| {
                DomainError::not_found(format!("no inventory configured for '{}'", book.title))
            })?;
            if available < *requested {
                return Err(DomainError::out_of_stock(&book.title));
            }
            books.insert(*id, book);
        }

        // One entry per unit, in request order, so duplicates count.
        let mut products = Vec::with_capacity(request.products.len());
        for id in &request.products {
            if let Some(book) = books.get(id) {
                products.push(book.clone());
            }
        }

        let order = OrderBuilder::new()
            .user(&request.user)
            .products(products)
            .shipping_address(&request.shipping_address)
            .build()?;
        let order_id = order.id;
        let total = order.total;
        txn.insert_order(order)?;

        if !self.gateway.charge(total) {
            // Compensating delete. Redundant with the rollback-on-drop below,
            // but kept as an independent safety net for deployments where the
            // charge runs outside the transaction boundary.
            txn.remove_order(&order_id);
            return Err(DomainError::payment("payment gateway rejected the charge"));
        }

        for (id, requested) in &quantities {
            txn.stage_decrement(*id, *requested)?;
        }
        txn.commit();

        tracing::info!(order = %order_id, %total, gateway = self.gateway.name(), "purchase committed");
        Ok(format!("order {order_id} processed successfully"))
    }

    /// Legacy single-item path: the degenerate one-row case of
    /// [`Self::execute_purchase`]. Persists an order referencing the book
    /// with guest defaults and returns the taxed total.
    pub fn quick_purchase(&self, book_id: BookId) -> DomainResult<Decimal> {
        let mut txn = self.store.begin(BTreeSet::from([book_id]));

        let book = txn
            .book(&book_id)
            .ok_or_else(|| DomainError::not_found(format!("book {book_id}")))?;
        let available = txn.stock_on_hand(&book_id)?.ok_or_else(|| {
            DomainError::not_found(format!("no inventory configured for '{}'", book.title))
        })?;
        if available == 0 {
            return Err(DomainError::out_of_stock(&book.title));
        }

        let total = tax::with_tax(book.unit_price);
        if !self.gateway.charge(total) {
            return Err(DomainError::payment("payment gateway rejected the charge"));
        }

        txn.insert_order(Order::quick(book_id, total))?;
        txn.stage_decrement(book_id, 1)?;
        txn.commit();

        tracing::info!(book = %book_id, %total, "quick purchase committed");
        Ok(total)
    }
}
