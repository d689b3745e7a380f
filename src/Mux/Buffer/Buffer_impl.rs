use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::{AcqRel, Acquire, Relaxed, Release};
use std::time::{Duration, Instant};

use crossbeam_utils::CachePadded;

use super::Buffer::{RingBuffer, Signal, Slot};
use crate::Core::MuxError;

impl<T> RingBuffer<T> {
    /// Create a ring holding at most `capacity` items.
    pub fn new(capacity: usize) -> Result<Self, MuxError> {
        Self::with_channel_id(capacity, 0)
    }

    pub fn with_channel_id(capacity: usize, channel_id: u32) -> Result<Self, MuxError> {
        if capacity == 0 {
            return Err(MuxError::ZeroCapacity);
        }
        let slot_count = capacity.max(2).next_power_of_two();

        // Initialize per-slot sequence numbers to k for k in 0..slot_count.
        let slots = (0..slot_count)
            .map(|k| Slot {
                sequence: AtomicU64::new(k as u64),
                value: UnsafeCell::new(MaybeUninit::uninit()),
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Ok(Self {
            channel_id,
            slots,
            capacity,
            mask: slot_count - 1,
            tail: CachePadded::new(AtomicU64::new(0)),
            head: CachePadded::new(AtomicU64::new(0)),
            signal: Signal::default(),
        })
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn channel_id(&self) -> u32 {
        self.channel_id
    }

    /// Number of claimed slots. Exact when no operation is in flight.
    #[inline]
    pub fn len(&self) -> usize {
        let tail = self.tail.load(Acquire);
        let head = self.head.load(Acquire);
        tail.saturating_sub(head) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    #[inline]
    fn slot(&self, sequence: u64) -> &Slot<T> {
        &self.slots[(sequence as usize) & self.mask]
    }

    /// Enqueue reserves a slot and publishes the item.
    /// Returns the item back if the ring is full.
    pub fn enqueue(&self, value: T) -> Result<(), T> {
        loop {
            let tail = self.tail.load(Relaxed);
            let head = self.head.load(Acquire);
            if tail.saturating_sub(head) >= self.capacity as u64 {
                return Err(value);
            }

            let slot = self.slot(tail);
            let seq = slot.sequence.load(Acquire);
            let dif = seq as i64 - tail as i64;

            if dif == 0 {
                if self
                    .tail
                    .compare_exchange_weak(tail, tail + 1, AcqRel, Relaxed)
                    .is_ok()
                {
                    // We own this slot now
                    unsafe {
                        (*slot.value.get()).write(value);
                    }
                    // Publish
                    slot.sequence.store(tail + 1, Release);
                    return Ok(());
                }
                continue;
            } else if dif < 0 {
                // full
                return Err(value);
            } else {
                // someone else is producing; backoff and retry
                std::hint::spin_loop();
            }
        }
    }

    /// Dequeue acquires a ready slot and returns its content.
    /// Returns None if the ring appears empty.
    pub fn dequeue(&self) -> Option<T> {
        loop {
            let head = self.head.load(Relaxed);
            let slot = self.slot(head);
            let seq = slot.sequence.load(Acquire);
            let dif = seq as i64 - (head as i64 + 1);

            if dif == 0 {
                if self
                    .head
                    .compare_exchange_weak(head, head + 1, AcqRel, Relaxed)
                    .is_ok()
                {
                    let value = unsafe { (*slot.value.get()).assume_init_read() };
                    // free slot for future producers
                    slot.sequence
                        .store(head + self.slots.len() as u64, Release);
                    return Some(value);
                }
                continue;
            } else if dif < 0 {
                // empty
                return None;
            } else {
                // producer not finished; retry
                std::hint::spin_loop();
            }
        }
    }

    /// Signal consumers that new data is available
    pub fn signal_consumer(&self) {
        let mut epoch = self.signal.epoch.lock();
        *epoch = epoch.wrapping_add(1);
        self.signal.ready.notify_all();
    }

    /// Park until the ring holds data or `timeout` elapses.
    /// Returns whether data was observed.
    pub fn wait_for_data(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut epoch = self.signal.epoch.lock();
        loop {
            // Checked under the lock: a producer publishes before it locks to signal.
            if !self.is_empty() {
                return true;
            }
            match deadline {
                Some(deadline) => {
                    if self.signal.ready.wait_until(&mut epoch, deadline).timed_out() {
                        return !self.is_empty();
                    }
                }
                None => self.signal.ready.wait(&mut epoch),
            }
        }
    }
}

impl<T> Drop for RingBuffer<T> {
    fn drop(&mut self) {
        while self.dequeue().is_some() {}
    }
}
