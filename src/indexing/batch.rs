//! Bounded write buffer with an explicit flush.

use std::mem;

/// Collects items until `capacity` is reached, then hands the full batch
/// back to the caller for a single bulk write.
#[derive(Debug)]
pub struct BatchBuffer<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> BatchBuffer<T> {
    /// Create a buffer that fills at `capacity` items (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Add an item; returns the full batch once the buffer reaches capacity.
    pub fn push(&mut self, item: T) -> Option<Vec<T>> {
        self.items.push(item);
        if self.items.len() >= self.capacity {
            Some(self.take())
        } else {
            None
        }
    }

    /// Take whatever is buffered, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<T> {
        self.take()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn take(&mut self) -> Vec<T> {
        mem::replace(&mut self.items, Vec::with_capacity(self.capacity))
    }
}
