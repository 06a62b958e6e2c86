use std::collections::{BTreeSet, HashSet};

use parking_lot::{Condvar, Mutex};

use tienda_core::BookId;

/// Exclusive per-row locks over inventory records.
///
/// `acquire` walks the requested ids in ascending order and waits on any row
/// held by another transaction. Because acquisition is ordered, a waiter only
/// ever blocks on an id strictly greater than every id it already holds, so
/// no cycle of waiters can form.
#[derive(Debug, Default)]
pub(crate) struct RowLocks {
    held: Mutex<HashSet<BookId>>,
    released: Condvar,
}

impl RowLocks {
    /// Block until every row in `rows` is exclusively held by the caller.
    pub(crate) fn acquire(&self, rows: &BTreeSet<BookId>) {
        let mut held = self.held.lock();
        for id in rows {
            while held.contains(id) {
                self.released.wait(&mut held);
            }
            held.insert(*id);
        }
    }

    pub(crate) fn release(&self, rows: &BTreeSet<BookId>) {
        let mut held = self.held.lock();
        for id in rows {
            held.remove(id);
        }
        self.released.notify_all();
    }
}
