//! Thread-safe free list for per-record scratch objects.
//!
//! Every object is reset before it goes back on the list, so one record's data
//! can never show up in the next record that borrows the same object.

use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};

/// Upper bound on idle objects kept per pool.
const MAX_IDLE: usize = 64;

/// Clears every field of a pooled object.
pub trait Reset {
    fn reset(&mut self);
}

impl Reset for Vec<u8> {
    fn reset(&mut self) {
        self.clear();
    }
}

/// A `const`-constructible pool, so it can live in a `static`.
pub struct Pool<T> {
    idle: Mutex<Vec<T>>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
        }
    }

    /// Number of objects waiting for reuse.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }
}

impl<T: Default + Reset> Pool<T> {
    /// Takes an idle object or creates a fresh one. It returns to the pool on drop.
    pub fn get(&self) -> Pooled<'_, T> {
        let item = self.idle.lock().pop().unwrap_or_default();
        Pooled {
            pool: self,
            item: Some(item),
        }
    }

    fn put(&self, mut item: T) {
        item.reset();
        let mut idle = self.idle.lock();
        if idle.len() < MAX_IDLE {
            idle.push(item);
        }
    }
}

/// Borrowed pool object; derefs to `T`.
pub struct Pooled<'a, T: Default + Reset> {
    pool: &'a Pool<T>,
    item: Option<T>,
}

impl<T: Default + Reset> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // `item` is only taken in `drop`.
        self.item.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<T: Default + Reset> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.item.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<T: Default + Reset> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(item) = self.item.take() {
            self.pool.put(item);
        }
    }
}
