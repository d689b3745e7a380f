mod builder;
mod channel;
mod consumer;
mod debug;
mod merger;
mod producer;
mod splitter;

pub use builder::{ChannelBuilder, MuxBuilder};
pub use channel::{Sink, Source};
pub use consumer::Consumer;
pub use merger::RoundRobinMerger;
pub use producer::Producer;
pub use splitter::{AnnotatedSplitter, Delivery};

pub mod Buffer {
    #[allow(non_snake_case)]
    pub mod Buffer;
    #[allow(non_snake_case)]
    pub mod Buffer_impl;
    pub mod staging;
    pub use staging::StagingQueue;
    pub use Buffer::RingBuffer; // re-export for stable path
}

pub use Buffer::{RingBuffer, StagingQueue};
