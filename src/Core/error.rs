use thiserror::Error;

/// Errors surfaced by topology construction and the checked entry points.
///
/// Ordinary data unavailability (empty source, empty staging queues, empty
/// input channel) is never an error; those paths report through `bool`,
/// `Option` or [`crate::Mux::Delivery`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MuxError {
    #[error("a topology needs at least one source")]
    NoSources,

    #[error("packet width {width} is outside 1..=64 bits")]
    InvalidWidth { width: u32 },

    #[error("header width {header_width} leaves no payload bits in a {width}-bit packet")]
    HeaderTooWide { header_width: u32, width: u32 },

    #[error("header width {header_width} cannot address {sources} sources (needs 2^H >= N)")]
    HeaderTooNarrow { header_width: u32, sources: usize },

    #[error("channel capacity must be at least 1")]
    ZeroCapacity,

    #[error("staging depth must be at least 1")]
    ZeroStagingDepth,

    #[error("merger expects {expected} sources, got {actual}")]
    SourceCountMismatch { expected: usize, actual: usize },

    #[error("splitter expects {expected} outputs, got {actual}")]
    OutputCountMismatch { expected: usize, actual: usize },

    #[error("channel {channel_id} is full")]
    ChannelFull { channel_id: u32 },

    #[error("intake cycle incomplete: {pending} source(s) not read before emit")]
    IntakeCycleIncomplete { pending: usize },
}
