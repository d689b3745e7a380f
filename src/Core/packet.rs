// Fixed-width tagged packet: [ tag (H bits) | payload (W - H bits) ], MSB first.

use super::error::MuxError;

/// A packet on the shared tagged channel.
///
/// Only the low `W` bits of the word are meaningful; the layout is described
/// by the [`PacketFormat`] the packet was encoded with. There is no length
/// field, version or checksum.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Packet(u64);

impl Packet {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<Packet> for u64 {
    fn from(packet: Packet) -> u64 {
        packet.0
    }
}

impl From<u64> for Packet {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// Topology-wide packet layout: number of sources `N`, total width `W` and
/// header width `H`.
///
/// Constructed once per topology. Construction enforces `2^H >= N`, so every
/// tag a merger can produce fits in the header and decodes back unchanged.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PacketFormat {
    sources: usize,
    width: u32,
    header_width: u32,
}

impl PacketFormat {
    /// Largest supported packet width.
    pub const MAX_WIDTH: u32 = u64::BITS;

    pub fn new(sources: usize, width: u32, header_width: u32) -> Result<Self, MuxError> {
        if sources == 0 {
            return Err(MuxError::NoSources);
        }
        if width == 0 || width > Self::MAX_WIDTH {
            return Err(MuxError::InvalidWidth { width });
        }
        if header_width >= width {
            return Err(MuxError::HeaderTooWide {
                header_width,
                width,
            });
        }
        // header_width < 64 here, so the shift cannot overflow u128
        if (1u128 << header_width) < sources as u128 {
            return Err(MuxError::HeaderTooNarrow {
                header_width,
                sources,
            });
        }

        Ok(Self {
            sources,
            width,
            header_width,
        })
    }

    /// Layout with the narrowest header able to address `sources` tags.
    pub fn compact(sources: usize, width: u32) -> Result<Self, MuxError> {
        Self::new(sources, width, Self::min_header_width(sources))
    }

    /// 64-bit word with a full 32-bit index as header.
    pub fn native(sources: usize) -> Result<Self, MuxError> {
        Self::new(sources, 64, 32)
    }

    /// Minimum bits needed to represent `sources - 1` (0 for a single source).
    pub fn min_header_width(sources: usize) -> u32 {
        if sources <= 1 {
            0
        } else {
            usize::BITS - (sources - 1).leading_zeros()
        }
    }

    #[inline]
    pub fn sources(&self) -> usize {
        self.sources
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn header_width(&self) -> u32 {
        self.header_width
    }

    #[inline]
    pub fn payload_width(&self) -> u32 {
        self.width - self.header_width
    }

    /// Shift that moves a tag into the header field (equals the payload width).
    #[inline]
    pub fn header_shift(&self) -> u32 {
        self.payload_width()
    }

    #[inline]
    pub fn payload_mask(&self) -> u64 {
        u64::MAX >> (u64::BITS - self.payload_width())
    }

    /// Whether `payload` fits the payload field without truncation.
    #[inline]
    pub fn fits(&self, payload: u64) -> bool {
        payload & !self.payload_mask() == 0
    }

    /// Pack `tag` and `payload`. Payload bits above the payload field are
    /// discarded so they can never alias into the tag.
    #[inline]
    pub fn encode(&self, tag: usize, payload: u64) -> Packet {
        debug_assert!(tag < self.sources, "tag {tag} out of range for {} sources", self.sources);
        let header = (tag as u64).checked_shl(self.header_shift()).unwrap_or(0);
        Packet(header | (payload & self.payload_mask()))
    }

    /// `packet >> (W - H)`. Stray bits above `W` make the tag invalid rather
    /// than being masked away.
    #[inline]
    pub fn tag_of(&self, packet: Packet) -> u64 {
        packet.0.checked_shr(self.header_shift()).unwrap_or(0)
    }

    #[inline]
    pub fn payload_of(&self, packet: Packet) -> u64 {
        packet.0 & self.payload_mask()
    }

    #[inline]
    pub fn decode(&self, packet: Packet) -> (u64, u64) {
        (self.tag_of(packet), self.payload_of(packet))
    }

    /// Maps a decoded tag onto a destination index, `None` when `tag >= N`.
    #[inline]
    pub fn destination(&self, tag: u64) -> Option<usize> {
        usize::try_from(tag).ok().filter(|&index| index < self.sources)
    }
}
