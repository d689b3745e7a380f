// src/Mux/producer.rs

use super::channel::Sink;
use super::Buffer::RingBuffer;
use crate::Core::MuxError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Write handle onto a bounded channel.
///
/// Cloning a producer shares the same ring, so several producers may feed
/// one channel. Every successful send wakes consumers parked in
/// [`super::Consumer::receive_blocking`].
pub struct Producer<T> {
    channel: Arc<RingBuffer<T>>,
    sent: Arc<AtomicU64>,
}

impl<T> Clone for Producer<T> {
    fn clone(&self) -> Self {
        Self {
            channel: Arc::clone(&self.channel),
            sent: Arc::clone(&self.sent),
        }
    }
}

impl<T> Producer<T> {
    pub(crate) fn new(channel: Arc<RingBuffer<T>>) -> Self {
        Self {
            channel,
            sent: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Sends an item through the channel.
    ///
    /// # Returns
    /// * `Ok(())` if the item was enqueued
    /// * `Err(MuxError::ChannelFull)` if the channel had no free slot; the item is dropped.
    ///   Use [`Sink::try_send`] to get it back instead.
    pub fn send(&self, item: T) -> Result<(), MuxError> {
        self.try_send(item).map_err(|_| MuxError::ChannelFull {
            channel_id: self.channel.channel_id(),
        })
    }

    /// Returns the channel ID for this producer
    pub fn channel_id(&self) -> u32 {
        self.channel.channel_id()
    }

    /// Number of items successfully sent through this producer and its clones.
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn capacity(&self) -> usize {
        self.channel.capacity()
    }

    /// The underlying ring, shared with the paired consumer.
    pub fn ring(&self) -> &Arc<RingBuffer<T>> {
        &self.channel
    }
}

impl<T> Sink<T> for Producer<T> {
    fn try_send(&self, item: T) -> Result<(), T> {
        self.channel.try_send(item)?;
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn is_full(&self) -> bool {
        self.channel.is_full()
    }
}
