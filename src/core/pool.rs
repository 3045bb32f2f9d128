//! Reusable object pool for simulation scratch states.
//!
//! Rollouts need a private copy of a `GameState` every iteration. The pool
//! keeps released objects on a free list and hands them out again, so the
//! hot loop stops allocating once it has warmed up.
//!
//! Objects are checked out through a [`Pooled`] guard that returns them on
//! drop, including during unwinding.

use std::mem;
use std::ops::{Deref, DerefMut};

/// Free-list pool of `T`.
#[derive(Debug, Default)]
pub struct Pool<T> {
    free: Vec<T>,
    created: usize,
    outstanding: usize,
}

impl<T: Default> Pool<T> {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            free: Vec::new(),
            created: 0,
            outstanding: 0,
        }
    }

    /// Create a pool with `count` objects already allocated.
    #[must_use]
    pub fn with_capacity(count: usize) -> Self {
        let mut free = Vec::with_capacity(count);
        free.resize_with(count, T::default);
        Self {
            free,
            created: count,
            outstanding: 0,
        }
    }

    /// Take an object out of the pool, creating one if the free list is empty.
    ///
    /// The object keeps whatever contents it had when it was released;
    /// callers overwrite it before use.
    pub fn checkout(&mut self) -> Pooled<'_, T> {
        let item = match self.free.pop() {
            Some(item) => item,
            None => {
                self.created += 1;
                T::default()
            }
        };
        self.outstanding += 1;
        Pooled { pool: self, item }
    }

    /// Objects currently sitting on the free list.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Objects checked out and not yet returned.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Objects ever allocated by this pool.
    #[must_use]
    pub fn created(&self) -> usize {
        self.created
    }

    fn release(&mut self, item: T) {
        self.outstanding -= 1;
        self.free.push(item);
    }
}

/// Checked-out pool object; goes back to the free list when dropped.
pub struct Pooled<'a, T: Default> {
    pool: &'a mut Pool<T>,
    item: T,
}

impl<T: Default> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<T: Default> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

impl<T: Default> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        // Leaves a default in the guard, which is dropped right after
        let item = mem::take(&mut self.item);
        self.pool.release(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;

    #[test]
    fn test_checkout_and_release() {
        let mut pool: Pool<GameState> = Pool::new();
        {
            let game = pool.checkout();
            assert_eq!(game.selectable_count(), 6);
        }
        assert_eq!(pool.created(), 1);
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_reuses_released_objects() {
        let mut pool: Pool<Vec<u8>> = Pool::with_capacity(2);
        for _ in 0..10 {
            let mut buffer = pool.checkout();
            buffer.push(1);
        }
        assert_eq!(pool.created(), 2);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn test_release_keeps_contents() {
        let mut pool: Pool<Vec<u8>> = Pool::new();
        pool.checkout().extend([1, 2, 3]);
        {
            let mut buffer = pool.checkout();
            assert_eq!(*buffer, [1, 2, 3]);
            buffer.push(4);
        }
        assert_eq!(pool.created(), 1);
        assert_eq!(*pool.checkout(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_released_on_panic() {
        let mut pool: Pool<GameState> = Pool::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _game = pool.checkout();
            panic!("rollout failed");
        }));
        assert!(result.is_err());
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.available(), 1);
    }
}
