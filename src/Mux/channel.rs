use std::sync::Arc;

use super::Buffer::RingBuffer;

/// Read side of a channel: non-blocking dequeue plus an emptiness query.
pub trait Source<T> {
    fn try_recv(&self) -> Option<T>;

    fn is_empty(&self) -> bool;
}

/// Write side of a channel: non-blocking enqueue that hands the item back
/// when there is no room.
pub trait Sink<T> {
    fn try_send(&self, item: T) -> Result<(), T>;

    fn is_full(&self) -> bool;
}

impl<T> Source<T> for RingBuffer<T> {
    #[inline]
    fn try_recv(&self) -> Option<T> {
        self.dequeue()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        RingBuffer::is_empty(self)
    }
}

impl<T> Sink<T> for RingBuffer<T> {
    #[inline]
    fn try_send(&self, item: T) -> Result<(), T> {
        self.enqueue(item)?;
        self.signal_consumer();
        Ok(())
    }

    #[inline]
    fn is_full(&self) -> bool {
        RingBuffer::is_full(self)
    }
}

impl<T, S: Source<T> + ?Sized> Source<T> for Arc<S> {
    #[inline]
    fn try_recv(&self) -> Option<T> {
        (**self).try_recv()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl<T, S: Sink<T> + ?Sized> Sink<T> for Arc<S> {
    #[inline]
    fn try_send(&self, item: T) -> Result<(), T> {
        (**self).try_send(item)
    }

    #[inline]
    fn is_full(&self) -> bool {
        (**self).is_full()
    }
}
