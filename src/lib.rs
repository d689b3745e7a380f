// Module naming follows project convention (Mux = annotated multiplexing primitives)
#[allow(non_snake_case)]
pub mod Mux;

#[allow(non_snake_case)]
pub mod Core {
    pub mod error;
    pub mod packet;
    pub use error::MuxError;
    pub use packet::{Packet, PacketFormat};
}

#[allow(non_snake_case)]
pub mod Debug {
    #[allow(non_snake_case)]
    pub mod StructDebug;
}

pub use Core::{MuxError, Packet, PacketFormat};
pub use Mux::{
    AnnotatedSplitter, ChannelBuilder, Consumer, Delivery, MuxBuilder, Producer, RingBuffer,
    RoundRobinMerger, Sink, Source,
};
