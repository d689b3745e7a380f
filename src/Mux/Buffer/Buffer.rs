// Bounded ring that backs every channel in a merge/split topology

use crossbeam_utils::CachePadded;
use parking_lot::{Condvar, Mutex};
use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::atomic::AtomicU64;

/// A single slot in the ring buffer.
pub(crate) struct Slot<T> {
    /// The sequence number of the slot. This is the core of the synchronization.
    /// - A producer claims a `tail` sequence and waits for the `sequence` in
    ///   the target slot to equal `tail`.
    /// - After writing, it sets the `sequence` to `tail + 1`, signaling completion.
    /// - A consumer waits for the `sequence` in its `head` slot to equal
    ///   `head + 1`, and frees the slot by storing `head + slots`.
    pub(crate) sequence: AtomicU64,

    /// The item, initialised only between publish and consume.
    pub(crate) value: UnsafeCell<MaybeUninit<T>>,
}

/// Wakes consumers parked in [`RingBuffer::wait_for_data`].
#[derive(Default)]
pub(crate) struct Signal {
    pub(crate) epoch: Mutex<u64>,
    pub(crate) ready: Condvar,
}

/// A lock-free, bounded, multi-producer, multi-consumer ring buffer.
///
/// This is the channel primitive of the crate: non-blocking `enqueue` hands
/// the item back when the ring is full, non-blocking `dequeue` returns `None`
/// when it is empty, and items leave in the order they were published.
///
/// ### Concurrency Design:
/// - **Producers (Enqueue)**: Producers claim a slot by atomically incrementing `tail`.
///   They use the `sequence` field in the `Slot` to know when the slot is free to
///   be written.
/// - **Consumers (Dequeue)**: Consumers claim an item by atomically incrementing `head`.
///   They use the `sequence` field to know when an item has been fully written by a producer.
///
/// The slot array is rounded up to a power of two (at least two slots so a
/// written slot is never mistaken for a free one); the logical `capacity` is
/// enforced separately against `head`, so a capacity-1 ring holds exactly one item.
pub struct RingBuffer<T> {
    /// Logical identifier, only used for diagnostics.
    pub(crate) channel_id: u32,

    pub(crate) slots: Box<[Slot<T>]>,

    /// Maximum number of items held at once.
    pub(crate) capacity: usize,

    /// A bitmask used to wrap sequence numbers around the slot array.
    /// Calculated as `slots.len() - 1`.
    pub(crate) mask: usize,

    /// The "tail" cursor for producers. Padded to prevent false sharing with `head`.
    pub(crate) tail: CachePadded<AtomicU64>,

    /// The "head" cursor for consumers.
    pub(crate) head: CachePadded<AtomicU64>,

    pub(crate) signal: Signal,
}

unsafe impl<T: Send> Send for RingBuffer<T> {}
unsafe impl<T: Send> Sync for RingBuffer<T> {}
