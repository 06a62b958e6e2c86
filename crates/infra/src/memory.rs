//! In-memory store with row-locked stock transactions.
//!
//! Intended for tests, the simulator, and as the reference semantics for any
//! future SQL backend (`begin` plays the role of `SELECT ... FOR UPDATE`).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use parking_lot::RwLock;
use thiserror::Error;

use tienda_catalog::{Book, Inventory};
use tienda_core::{BookId, DomainError, OrderId};
use tienda_orders::Order;

use crate::row_locks::RowLocks;

/// Storage-layer error. Business-rule failures (missing book, insufficient
/// stock for a request) are the service's to diagnose; these arise only when
/// a caller breaks the transaction discipline or an invariant is about to be
/// violated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no inventory row for book {0}")]
    MissingInventory(BookId),

    #[error("row {0} is not locked by this transaction")]
    RowNotLocked(BookId),

    #[error("decrement to {requested} exceeds stock {available} for book {book_id}")]
    InsufficientStock {
        book_id: BookId,
        requested: u32,
        available: u32,
    },

    #[error("order {0} already exists")]
    DuplicateOrder(OrderId),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        DomainError::storage(e.to_string())
    }
}

/// Shared store for books, inventory rows and orders.
///
/// Books are immutable reference data and freely readable. Inventory rows are
/// the only mutable shared resource: they may be written solely through a
/// [`StockTransaction`] holding the corresponding row locks. Orders are
/// written only by transactions as well.
#[derive(Debug, Default)]
pub struct MemoryStore {
    books: RwLock<HashMap<BookId, Book>>,
    inventory: RwLock<HashMap<BookId, Inventory>>,
    orders: RwLock<HashMap<OrderId, Order>>,
    row_locks: RowLocks,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_book(&self, book: Book) {
        self.books.write().insert(book.id, book);
    }

    /// Create or replace the inventory row for a book.
    pub fn set_stock(&self, book_id: BookId, quantity: u32) {
        self.inventory
            .write()
            .insert(book_id, Inventory::new(book_id, quantity));
    }

    pub fn book(&self, id: &BookId) -> Option<Book> {
        self.books.read().get(id).cloned()
    }

    pub fn books(&self) -> Vec<Book> {
        self.books.read().values().cloned().collect()
    }

    /// Committed stock level; `None` if no inventory row exists.
    pub fn stock_on_hand(&self, id: &BookId) -> Option<u32> {
        self.inventory.read().get(id).map(|inv| inv.quantity)
    }

    pub fn order(&self, id: &OrderId) -> Option<Order> {
        self.orders.read().get(id).cloned()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.orders.read().values().cloned().collect()
    }

    pub fn order_count(&self) -> usize {
        self.orders.read().len()
    }

    /// Open a unit of work over the given inventory rows.
    ///
    /// Blocks until every row lock is held; locks are acquired in ascending
    /// id order and kept until [`StockTransaction::commit`] or drop.
    pub fn begin(&self, rows: BTreeSet<BookId>) -> StockTransaction<'_> {
        self.row_locks.acquire(&rows);
        StockTransaction {
            store: self,
            rows,
            decrements: BTreeMap::new(),
            staged_orders: Vec::new(),
            released: false,
        }
    }
}

/// A unit of work holding exclusive locks on a fixed set of inventory rows.
///
/// Reads observe committed state. Writes are staged and become visible
/// atomically at `commit`; dropping the transaction without committing
/// discards every staged write and releases the locks (rollback).
#[derive(Debug)]
pub struct StockTransaction<'a> {
    store: &'a MemoryStore,
    rows: BTreeSet<BookId>,
    decrements: BTreeMap<BookId, u32>,
    staged_orders: Vec<Order>,
    released: bool,
}

impl StockTransaction<'_> {
    pub fn book(&self, id: &BookId) -> Option<Book> {
        self.store.book(id)
    }

    /// Committed stock for a locked row; `Ok(None)` if the book has no
    /// inventory row at all.
    pub fn stock_on_hand(&self, id: &BookId) -> Result<Option<u32>, StoreError> {
        if !self.rows.contains(id) {
            return Err(StoreError::RowNotLocked(*id));
        }
        Ok(self.store.stock_on_hand(id))
    }

    /// Stage a stock decrement against a locked row.
    ///
    /// Rejects any decrement that would take the row below zero, counting
    /// decrements already staged in this transaction. Since the row lock is
    /// held, the committed quantity cannot shift underneath this check.
    pub fn stage_decrement(&mut self, id: BookId, quantity: u32) -> Result<(), StoreError> {
        let available = self
            .stock_on_hand(&id)?
            .ok_or(StoreError::MissingInventory(id))?;
        let staged = self.decrements.get(&id).copied().unwrap_or(0);
        let requested = staged
            .checked_add(quantity)
            .ok_or(StoreError::InsufficientStock {
                book_id: id,
                requested: u32::MAX,
                available,
            })?;
        if requested > available {
            return Err(StoreError::InsufficientStock {
                book_id: id,
                requested,
                available,
            });
        }
        self.decrements.insert(id, requested);
        Ok(())
    }

    /// Stage an order insert.
    pub fn insert_order(&mut self, order: Order) -> Result<(), StoreError> {
        let exists = self.staged_orders.iter().any(|o| o.id == order.id)
            || self.store.orders.read().contains_key(&order.id);
        if exists {
            return Err(StoreError::DuplicateOrder(order.id));
        }
        self.staged_orders.push(order);
        Ok(())
    }

    /// Drop a staged order (compensating action for a failed charge).
    pub fn remove_order(&mut self, id: &OrderId) {
        self.staged_orders.retain(|o| o.id != *id);
    }

    /// Apply every staged write atomically and release the row locks.
    pub fn commit(mut self) {
        {
            let mut inventory = self.store.inventory.write();
            for (id, quantity) in &self.decrements {
                if let Some(inv) = inventory.get_mut(id) {
                    // Checked at stage time against the locked row.
                    inv.quantity -= quantity;
                }
            }
        }
        if !self.staged_orders.is_empty() {
            let mut orders = self.store.orders.write();
            for order in self.staged_orders.drain(..) {
                orders.insert(order.id, order);
            }
        }
        tracing::debug!(rows = self.rows.len(), "stock transaction committed");
        self.release();
    }

    fn release(&mut self) {
        if !self.released {
            self.store.row_locks.release(&self.rows);
            self.released = true;
        }
    }
}

impl Drop for StockTransaction<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    use rust_decimal_macros::dec;

    use super::*;

    fn seeded_store(quantity: u32) -> (MemoryStore, BookId) {
        let store = MemoryStore::new();
        let book = Book::new("Libro A", dec!(100.00));
        let id = book.id;
        store.insert_book(book);
        store.set_stock(id, quantity);
        (store, id)
    }

    #[test]
    fn staged_writes_are_invisible_until_commit() {
        let (store, id) = seeded_store(5);

        let mut txn = store.begin(BTreeSet::from([id]));
        txn.stage_decrement(id, 3).unwrap();
        txn.insert_order(Order::quick(id, dec!(119.00))).unwrap();
        assert_eq!(store.stock_on_hand(&id), Some(5));
        assert_eq!(store.order_count(), 0);

        txn.commit();
        assert_eq!(store.stock_on_hand(&id), Some(2));
        assert_eq!(store.order_count(), 1);
    }

    #[test]
    fn dropping_a_transaction_rolls_back() {
        let (store, id) = seeded_store(5);

        {
            let mut txn = store.begin(BTreeSet::from([id]));
            txn.stage_decrement(id, 5).unwrap();
            txn.insert_order(Order::quick(id, dec!(119.00))).unwrap();
        }

        assert_eq!(store.stock_on_hand(&id), Some(5));
        assert_eq!(store.order_count(), 0);
    }

    #[test]
    fn decrement_past_zero_is_rejected() {
        let (store, id) = seeded_store(2);

        let mut txn = store.begin(BTreeSet::from([id]));
        txn.stage_decrement(id, 2).unwrap();
        let err = txn.stage_decrement(id, 1).unwrap_err();
        assert_eq!(
            err,
            StoreError::InsufficientStock {
                book_id: id,
                requested: 3,
                available: 2,
            }
        );
    }

    #[test]
    fn reading_an_unlocked_row_is_an_error() {
        let (store, id) = seeded_store(1);
        let other = BookId::new();

        let txn = store.begin(BTreeSet::from([id]));
        assert_eq!(txn.stock_on_hand(&other), Err(StoreError::RowNotLocked(other)));
    }

    #[test]
    fn compensating_remove_unstages_the_order() {
        let (store, id) = seeded_store(1);

        let mut txn = store.begin(BTreeSet::from([id]));
        let order = Order::quick(id, dec!(119.00));
        let order_id = order.id;
        txn.insert_order(order).unwrap();
        txn.remove_order(&order_id);
        txn.commit();

        assert_eq!(store.order_count(), 0);
    }

    #[test]
    fn row_lock_serializes_overlapping_transactions() {
        let (store, id) = seeded_store(2);
        let store = Arc::new(store);
        let barrier = Arc::new(Barrier::new(2));

        let handle = thread::spawn({
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            move || {
                let mut txn = store.begin(BTreeSet::from([id]));
                barrier.wait(); // lock is held before the main thread begins
                thread::sleep(Duration::from_millis(50));
                txn.stage_decrement(id, 1).unwrap();
                txn.commit();
            }
        });

        barrier.wait();
        // Blocks until the first transaction commits, then sees its write.
        let txn = store.begin(BTreeSet::from([id]));
        assert_eq!(txn.stock_on_hand(&id), Ok(Some(1)));
        drop(txn);

        handle.join().unwrap();
    }
}
