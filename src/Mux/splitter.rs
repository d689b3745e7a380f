// src/Mux/splitter.rs

use tracing::{debug, trace};

use super::channel::{Sink, Source};
use crate::Core::{MuxError, Packet, PacketFormat};

/// Outcome of a single [`AnnotatedSplitter::route`] call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The payload was written to output `tag`.
    Delivered { tag: usize },
    /// The input channel had nothing to offer.
    Empty,
    /// The decoded tag addressed no output; the packet was dropped.
    InvalidTag { tag: u64 },
    /// Output `tag` was full; the payload is parked and retried on the next call.
    Stalled { tag: usize },
}

impl Delivery {
    #[inline]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered { .. })
    }
}

/// 1-to-N splitter that routes each packet's payload to the output named by
/// its tag, stripping the tag.
///
/// Owns its N outputs. A packet whose destination is full is held in a
/// single-entry register and no further input is read until it has been
/// delivered, so per-destination order is preserved and nothing is lost.
pub struct AnnotatedSplitter<S> {
    format: PacketFormat,
    outputs: Vec<S>,
    parked: Option<(usize, u64)>,
    delivered: u64,
    dropped: u64,
}

impl<S: Sink<u64>> AnnotatedSplitter<S> {
    pub fn new(format: PacketFormat, outputs: Vec<S>) -> Result<Self, MuxError> {
        if outputs.len() != format.sources() {
            return Err(MuxError::OutputCountMismatch {
                expected: format.sources(),
                actual: outputs.len(),
            });
        }

        debug!(
            destinations = format.sources(),
            width = format.width(),
            header_width = format.header_width(),
            "annotated splitter created"
        );

        Ok(Self {
            format,
            outputs,
            parked: None,
            delivered: 0,
            dropped: 0,
        })
    }

    /// Non-blocking: moves at most one packet from `input` to its destination.
    pub fn route<I: Source<Packet> + ?Sized>(&mut self, input: &I) -> Delivery {
        if let Some((index, payload)) = self.parked.take() {
            return self.deliver(index, payload);
        }

        let Some(packet) = input.try_recv() else {
            return Delivery::Empty;
        };

        let (tag, payload) = self.format.decode(packet);
        match self.format.destination(tag) {
            Some(index) => self.deliver(index, payload),
            None => {
                self.dropped += 1;
                debug!(
                    tag,
                    destinations = self.format.sources(),
                    "dropping packet with out-of-range tag"
                );
                Delivery::InvalidTag { tag }
            }
        }
    }

    /// `true` only when a payload reached an output. An empty input, an
    /// invalid tag and a full destination all report `false`.
    pub fn consume<I: Source<Packet> + ?Sized>(&mut self, input: &I) -> bool {
        self.route(input).is_delivered()
    }

    /// Routes until the input runs dry or a destination stalls.
    /// Returns the number of payloads delivered.
    pub fn drain_from<I: Source<Packet> + ?Sized>(&mut self, input: &I) -> usize {
        let mut delivered = 0;
        loop {
            match self.route(input) {
                Delivery::Delivered { .. } => delivered += 1,
                Delivery::InvalidTag { .. } => {}
                Delivery::Empty | Delivery::Stalled { .. } => return delivered,
            }
        }
    }

    fn deliver(&mut self, index: usize, payload: u64) -> Delivery {
        match self.outputs[index].try_send(payload) {
            Ok(()) => {
                self.delivered += 1;
                trace!(tag = index, payload, "delivered");
                Delivery::Delivered { tag: index }
            }
            Err(payload) => {
                trace!(tag = index, "destination full, packet parked");
                self.parked = Some((index, payload));
                Delivery::Stalled { tag: index }
            }
        }
    }
}

impl<S> AnnotatedSplitter<S> {
    pub fn format(&self) -> &PacketFormat {
        &self.format
    }

    pub fn destinations(&self) -> usize {
        self.outputs.len()
    }

    pub fn output(&self, index: usize) -> Option<&S> {
        self.outputs.get(index)
    }

    pub fn outputs(&self) -> &[S] {
        &self.outputs
    }

    /// Whether a payload is waiting for room in its destination.
    pub fn has_parked(&self) -> bool {
        self.parked.is_some()
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Packets discarded for carrying a tag >= N.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn into_outputs(self) -> Vec<S> {
        self.outputs
    }
}
