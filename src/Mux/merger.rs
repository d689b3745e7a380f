// src/Mux/merger.rs

use tracing::{debug, trace, warn};

use super::channel::{Sink, Source};
use super::Buffer::StagingQueue;
use crate::Core::{MuxError, Packet, PacketFormat};

/// N-to-1 merger that tags every item with the index of its source.
///
/// A driver calls [`intake`](Self::intake) once per source in a fixed order,
/// completing a full cycle, then calls [`emit`](Self::emit) as often as the
/// shared channel allows:
///
/// ```
/// use annotated_mux::{MuxBuilder, Sink};
///
/// let builder = MuxBuilder::new().with_sources(2).with_width(16);
/// let mut merger = builder.build_merger().unwrap();
/// let (inputs, sources) = builder.build_sources().unwrap();
/// let (link_tx, link_rx) = builder.build_link().unwrap();
///
/// inputs[0].try_send(7).unwrap();
/// inputs[1].try_send(9).unwrap();
/// for source in &sources {
///     merger.intake(source);
/// }
/// while merger.emit(&link_tx) {}
/// assert_eq!(link_rx.len(), 2);
/// ```
///
/// Emission visits the staging queues in strict round-robin order starting at
/// the cursor, skipping empty ones, so no source with staged data is ever
/// passed over in favour of an empty one.
pub struct RoundRobinMerger {
    format: PacketFormat,

    /// One queue per source, filled only by `intake` and drained only by `emit`.
    staging: Box<[StagingQueue<u64>]>,

    /// Source the next `intake` call reads from. Advances on every call.
    next_intake_source: usize,

    /// First candidate for the next emission. Advances only after a successful emit.
    round_robin_cursor: usize,

    emitted: u64,
}

impl RoundRobinMerger {
    pub const DEFAULT_STAGING_DEPTH: usize = 1024;

    pub fn new(format: PacketFormat, staging_depth: usize) -> Result<Self, MuxError> {
        if staging_depth == 0 {
            return Err(MuxError::ZeroStagingDepth);
        }
        let staging = (0..format.sources())
            .map(|_| StagingQueue::new(staging_depth))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        debug!(
            sources = format.sources(),
            width = format.width(),
            header_width = format.header_width(),
            staging_depth,
            "round-robin merger created"
        );

        Ok(Self {
            format,
            staging,
            next_intake_source: 0,
            round_robin_cursor: 0,
            emitted: 0,
        })
    }

    /// Non-blocking read of one item from `source` into the staging queue of
    /// the current intake index. The index advances whether or not an item
    /// was available. A full staging queue leaves the item in `source`.
    pub fn intake<S: Source<u64> + ?Sized>(&mut self, source: &S) {
        let index = self.next_intake_source;
        let queue = &mut self.staging[index];

        if queue.is_full() {
            trace!(source = index, "staging queue full, item left in source");
        } else if let Some(item) = source.try_recv() {
            if !self.format.fits(item) {
                warn!(
                    source = index,
                    payload = item,
                    payload_width = self.format.payload_width(),
                    "payload wider than the payload field, high bits will be truncated"
                );
            }
            if queue.push(item).is_ok() {
                trace!(source = index, payload = item, "staged");
            }
        }

        self.next_intake_source = (index + 1) % self.format.sources();
    }

    /// Runs one complete intake cycle over `sources`, which must hold exactly
    /// one channel per source in index order.
    pub fn intake_cycle<S: Source<u64>>(&mut self, sources: &[S]) -> Result<(), MuxError> {
        if sources.len() != self.format.sources() {
            return Err(MuxError::SourceCountMismatch {
                expected: self.format.sources(),
                actual: sources.len(),
            });
        }
        self.check_intake_cycle()?;
        for source in sources {
            self.intake(source);
        }
        Ok(())
    }

    /// Emits one tagged packet into `output`.
    ///
    /// Returns `false` when every staging queue is empty, or when `output`
    /// has no room; in both cases nothing changes.
    ///
    /// # Panics
    /// With `debug_assertions` enabled, panics if called in the middle of an
    /// intake cycle. Release builds skip the check; see [`checked_emit`](Self::checked_emit).
    pub fn emit<K: Sink<Packet> + ?Sized>(&mut self, output: &K) -> bool {
        #[cfg(debug_assertions)]
        if let Err(violation) = self.check_intake_cycle() {
            panic!("{violation}: read every source exactly once before merging");
        }
        self.emit_unchecked(output)
    }

    /// [`emit`](Self::emit) with the intake-cycle precondition checked in every build.
    pub fn checked_emit<K: Sink<Packet> + ?Sized>(&mut self, output: &K) -> Result<bool, MuxError> {
        self.check_intake_cycle()?;
        Ok(self.emit_unchecked(output))
    }

    /// Emits until the staging queues are empty or `output` is full.
    /// Returns the number of packets emitted.
    pub fn drain_into<K: Sink<Packet> + ?Sized>(&mut self, output: &K) -> usize {
        let mut emitted = 0;
        while self.emit(output) {
            emitted += 1;
        }
        emitted
    }

    fn emit_unchecked<K: Sink<Packet> + ?Sized>(&mut self, output: &K) -> bool {
        let Some(index) = self.next_candidate() else {
            return false;
        };
        let Some(&payload) = self.staging[index].front() else {
            return false;
        };

        let packet = self.format.encode(index, payload);
        if output.try_send(packet).is_err() {
            trace!(source = index, "output channel full, emit deferred");
            return false;
        }

        self.staging[index].pop();
        self.round_robin_cursor = (index + 1) % self.format.sources();
        self.emitted += 1;
        trace!(source = index, payload, "emitted");
        true
    }

    /// First non-empty staging queue, scanning all N candidates from the cursor.
    fn next_candidate(&self) -> Option<usize> {
        let n = self.format.sources();
        (0..n)
            .map(|offset| (self.round_robin_cursor + offset) % n)
            .find(|&index| !self.staging[index].is_empty())
    }

    fn check_intake_cycle(&self) -> Result<(), MuxError> {
        if self.next_intake_source == 0 {
            Ok(())
        } else {
            Err(MuxError::IntakeCycleIncomplete {
                pending: self.format.sources() - self.next_intake_source,
            })
        }
    }

    pub fn format(&self) -> &PacketFormat {
        &self.format
    }

    pub fn sources(&self) -> usize {
        self.format.sources()
    }

    pub fn next_intake_source(&self) -> usize {
        self.next_intake_source
    }

    pub fn round_robin_cursor(&self) -> usize {
        self.round_robin_cursor
    }

    /// Items staged for `source`; 0 for an out-of-range index.
    pub fn staged(&self, source: usize) -> usize {
        self.staging.get(source).map_or(0, StagingQueue::len)
    }

    pub fn staged_total(&self) -> usize {
        self.staging.iter().map(StagingQueue::len).sum()
    }

    pub fn is_drained(&self) -> bool {
        self.staging.iter().all(StagingQueue::is_empty)
    }

    pub fn staging_depth(&self) -> usize {
        self.staging[0].depth()
    }

    /// Total packets emitted over the merger's lifetime.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}
