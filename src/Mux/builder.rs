use std::sync::Arc;

use super::{AnnotatedSplitter, Consumer, Producer, RingBuffer, RoundRobinMerger};
use crate::Core::{MuxError, Packet, PacketFormat};

pub struct ChannelBuilder {
    capacity: usize,
    channel_id: u32,
}

impl Default for ChannelBuilder {
    fn default() -> Self {
        Self {
            capacity: 64,
            channel_id: 0, // Default channel ID
        }
    }
}

impl ChannelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_channel_id(mut self, channel_id: u32) -> Self {
        self.channel_id = channel_id;
        self
    }

    pub fn build_ring<T>(&self) -> Result<Arc<RingBuffer<T>>, MuxError> {
        Ok(Arc::new(RingBuffer::with_channel_id(
            self.capacity,
            self.channel_id,
        )?))
    }

    pub fn build<T>(&self) -> Result<(Producer<T>, Consumer<T>), MuxError> {
        let ring = self.build_ring()?;
        Ok((Producer::new(Arc::clone(&ring)), Consumer::new(ring)))
    }
}

/// Configuration for a merge/split topology: N, W, H and channel sizing.
///
/// Leaving the header width unset selects the narrowest header that can
/// address every source.
#[derive(Clone, Debug)]
pub struct MuxBuilder {
    sources: usize,
    width: u32,
    header_width: Option<u32>,
    capacity: usize,
    staging_depth: usize,
}

impl Default for MuxBuilder {
    fn default() -> Self {
        Self {
            sources: 1,
            width: PacketFormat::MAX_WIDTH,
            header_width: None,
            capacity: 64,
            staging_depth: RoundRobinMerger::DEFAULT_STAGING_DEPTH,
        }
    }
}

impl MuxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sources(mut self, sources: usize) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_header_width(mut self, header_width: u32) -> Self {
        self.header_width = Some(header_width);
        self
    }

    /// Capacity of every channel built by this builder.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_staging_depth(mut self, staging_depth: usize) -> Self {
        self.staging_depth = staging_depth;
        self
    }

    pub fn format(&self) -> Result<PacketFormat, MuxError> {
        match self.header_width {
            Some(header_width) => PacketFormat::new(self.sources, self.width, header_width),
            None => PacketFormat::compact(self.sources, self.width),
        }
    }

    pub fn build_merger(&self) -> Result<RoundRobinMerger, MuxError> {
        RoundRobinMerger::new(self.format()?, self.staging_depth)
    }

    /// Builds the splitter together with one output channel per destination;
    /// the returned consumers read those outputs in index order.
    pub fn build_splitter(
        &self,
    ) -> Result<(AnnotatedSplitter<Producer<u64>>, Vec<Consumer<u64>>), MuxError> {
        let format = self.format()?;
        let (outputs, readers) = self.build_channels(format.sources())?;
        Ok((AnnotatedSplitter::new(format, outputs)?, readers))
    }

    /// One payload channel per source, for feeding a merger.
    pub fn build_sources(&self) -> Result<(Vec<Producer<u64>>, Vec<Consumer<u64>>), MuxError> {
        let format = self.format()?;
        self.build_channels(format.sources())
    }

    /// The shared tagged channel between merger and splitter.
    pub fn build_link(&self) -> Result<(Producer<Packet>, Consumer<Packet>), MuxError> {
        let sources = self.format()?.sources();
        ChannelBuilder::new()
            .with_capacity(self.capacity)
            .with_channel_id(u32::try_from(sources).unwrap_or(u32::MAX))
            .build()
    }

    fn build_channels(
        &self,
        count: usize,
    ) -> Result<(Vec<Producer<u64>>, Vec<Consumer<u64>>), MuxError> {
        (0..count)
            .map(|index| {
                ChannelBuilder::new()
                    .with_capacity(self.capacity)
                    .with_channel_id(u32::try_from(index).unwrap_or(u32::MAX))
                    .build::<u64>()
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|pairs| pairs.into_iter().unzip())
    }
}
