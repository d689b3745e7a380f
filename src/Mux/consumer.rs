// src/Mux/consumer.rs

use super::channel::Source;
use super::Buffer::RingBuffer;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Read handle onto a bounded channel.
pub struct Consumer<T> {
    channel: Arc<RingBuffer<T>>,
}

impl<T> Clone for Consumer<T> {
    fn clone(&self) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
        }
    }
}

impl<T> Consumer<T> {
    pub(crate) fn new(channel: Arc<RingBuffer<T>>) -> Self {
        Self { channel }
    }

    /// Receives an item from the channel if one is available.
    pub fn receive(&self) -> Option<T> {
        self.channel.dequeue()
    }

    /// Receives an item, parking the thread until one is available.
    pub fn receive_blocking(&self) -> T {
        loop {
            if let Some(item) = self.channel.dequeue() {
                return item;
            }
            self.channel.wait_for_data(None);
        }
    }

    /// Receives an item from the channel, waiting up to the specified timeout.
    ///
    /// # Returns
    /// * `Some(item)` if an item was received
    /// * `None` if the timeout was reached
    pub fn receive_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(item) = self.channel.dequeue() {
                return Some(item);
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.channel.wait_for_data(Some(remaining)) {
                // One last look in case another consumer raced us to the wakeup.
                return self.channel.dequeue();
            }
        }
    }

    /// Drains everything currently queued, in FIFO order.
    pub fn drain(&self) -> Vec<T> {
        std::iter::from_fn(|| self.channel.dequeue()).collect()
    }

    /// Returns the channel ID for this consumer
    pub fn channel_id(&self) -> u32 {
        self.channel.channel_id()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// The underlying ring, shared with the paired producer.
    pub fn ring(&self) -> &Arc<RingBuffer<T>> {
        &self.channel
    }
}

impl<T> Source<T> for Consumer<T> {
    fn try_recv(&self) -> Option<T> {
        self.receive()
    }

    fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}
