use crate::error::Result;
use std::collections::VecDeque;

/// Unbounded FIFO of pending items for a single subscriber.
///
/// There is no upper bound: a subscriber that never drains its queue keeps
/// growing it. Capacity is reserved fallibly so an allocation failure surfaces
/// as an error instead of aborting the process.
#[derive(Debug)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Appends to the tail. On failure the queue is left untouched.
    pub fn enqueue(&mut self, item: T) -> Result<()> {
        self.items.try_reserve(1)?;
        self.items.push_back(item);
        Ok(())
    }

    /// Removes the head. Callers must check `is_empty` (or block until the
    /// queue is non-empty) first; `None` means that contract was broken.
    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}
