use std::fmt;

use super::{AnnotatedSplitter, Consumer, Producer, RingBuffer, RoundRobinMerger};
use crate::Core::{Packet, PacketFormat};
use crate::Debug::StructDebug;

// Debug proxy implementations that call the standalone debug functions
impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_packet(self, f)
    }
}

impl fmt::Debug for PacketFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_packet_format(self, f)
    }
}

impl<T> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_ring_buffer(self, f)
    }
}

impl<T> fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer")
            .field("channel", self.ring())
            .field("sent", &self.sent())
            .finish()
    }
}

impl<T> fmt::Debug for Consumer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").field("channel", self.ring()).finish()
    }
}

impl fmt::Debug for RoundRobinMerger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_merger(self, f)
    }
}

impl<S> fmt::Debug for AnnotatedSplitter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        StructDebug::debug_splitter(self, f)
    }
}
