use std::collections::VecDeque;

/// Bounded FIFO owned by a single component.
///
/// The merger keeps one of these per source. It is never shared, so unlike
/// [`super::RingBuffer`] it needs no synchronisation and supports peeking
/// at the head, which lets `emit` commit only after the output accepted
/// the packet. Storage is reserved up front and never grows.
pub struct StagingQueue<T> {
    items: VecDeque<T>,
    depth: usize,
}

impl<T> StagingQueue<T> {
    pub fn new(depth: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(depth),
            depth,
        }
    }

    /// Append `item`, handing it back when the queue is at depth.
    pub fn push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.items.push_back(item);
        Ok(())
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.depth
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}
