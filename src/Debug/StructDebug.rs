use std::fmt;

use crate::Core::{Packet, PacketFormat};
use crate::Mux::{AnnotatedSplitter, RingBuffer, RoundRobinMerger};

/// Binary rendering of a packet split at the header boundary, e.g.
/// `01|0000000000000011` for tag 1, payload 3 in an 18-bit packet with H = 2.
pub struct PacketBits<'a> {
    pub format: &'a PacketFormat,
    pub packet: Packet,
}

impl fmt::Display for PacketBits<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let payload_width = self.format.payload_width() as usize;
        let header_width = self.format.header_width() as usize;
        let payload = self.format.payload_of(self.packet);
        if header_width > 0 {
            let tag = self.format.tag_of(self.packet);
            write!(f, "{tag:0header_width$b}|")?;
        }
        write!(f, "{payload:0payload_width$b}")
    }
}

impl PacketFormat {
    /// Bit-pattern view of `packet` for logs and test failure messages.
    pub fn bits(&self, packet: Packet) -> PacketBits<'_> {
        PacketBits {
            format: self,
            packet,
        }
    }
}

/// Debug function for Packet
///
/// Raw word in hex; the layout is only known to a format.
pub fn debug_packet(packet: &Packet, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Packet({:#x})", packet.raw())
}

pub fn debug_packet_format(format: &PacketFormat, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PacketFormat")
        .field("sources", &format.sources())
        .field("width", &format.width())
        .field("header_width", &format.header_width())
        .finish()
}

/// Debug function for RingBuffer
///
/// Shows cursors and occupancy without touching slot contents
pub fn debug_ring_buffer<T>(buffer: &RingBuffer<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RingBuffer")
        .field("channel_id", &buffer.channel_id())
        .field("capacity", &buffer.capacity())
        .field("len", &buffer.len())
        .finish_non_exhaustive()
}

/// Debug function for RoundRobinMerger
///
/// Shows:
/// - Intake index and round-robin cursor
/// - Per-source staging occupancy
pub fn debug_merger(merger: &RoundRobinMerger, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let staged: Vec<usize> = (0..merger.sources()).map(|i| merger.staged(i)).collect();
    f.debug_struct("RoundRobinMerger")
        .field("format", merger.format())
        .field("next_intake_source", &merger.next_intake_source())
        .field("round_robin_cursor", &merger.round_robin_cursor())
        .field("staged", &staged)
        .field("emitted", &merger.emitted())
        .finish()
}

pub fn debug_splitter<S>(splitter: &AnnotatedSplitter<S>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AnnotatedSplitter")
        .field("format", splitter.format())
        .field("destinations", &splitter.destinations())
        .field("parked", &splitter.has_parked())
        .field("delivered", &splitter.delivered())
        .field("dropped", &splitter.dropped())
        .finish()
}
