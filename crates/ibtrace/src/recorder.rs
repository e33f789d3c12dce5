//! Recorder entry points for work-request lifecycle events.

use std::time::Instant;

use crate::format::{TraceRecord, PHASE_COMPLETED, PHASE_POSTED, STATUS_NONE};
use crate::ring::{RecordSlot, TraceRing};
use crate::DEFAULT_CAPACITY;

/// In-process work-request tracer.
///
/// The host transport constructs one context, shares it by reference across
/// its worker threads, and calls [`TraceContext::shutdown`] before exit.
/// Every entry point timestamps the event with a monotonic clock, reserves a
/// ring slot with a single atomic increment, and stores the fields. None of
/// them blocks, allocates, or can fail, so they are safe to call from the
/// transport's hot path.
#[derive(Debug)]
pub struct TraceContext {
    ring: TraceRing,
    epoch: Instant,
}

impl TraceContext {
    /// A context with the default capacity of [`DEFAULT_CAPACITY`] records.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` is rounded up to the next power of two. The backing
    /// storage is allocated once, here, and lives until the context drops.
    pub fn with_capacity(capacity: usize) -> Self {
        let ctx = Self {
            ring: TraceRing::new(capacity),
            epoch: Instant::now(),
        };
        crate::lifecycle::announce_config(&ctx);
        ctx
    }

    /// Record a work request posted to a send queue.
    #[inline]
    pub fn post_send(&self, wr_id: u64, size: u32, dev: u16, qp: u16, opcode: u8, extra: u32) {
        self.log(TraceRecord {
            t_ns: 0,
            wr_id,
            size,
            dev,
            qp,
            opcode,
            is_send: 1,
            phase: PHASE_POSTED,
            status: STATUS_NONE,
            extra,
        });
    }

    /// Record a work request posted to a receive queue.
    #[inline]
    pub fn post_recv(&self, wr_id: u64, size: u32, dev: u16, qp: u16, opcode: u8, extra: u32) {
        self.log(TraceRecord {
            t_ns: 0,
            wr_id,
            size,
            dev,
            qp,
            opcode,
            is_send: 0,
            phase: PHASE_POSTED,
            status: STATUS_NONE,
            extra,
        });
    }

    /// Record a completion notification for a previously posted request.
    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub fn complete(
        &self,
        wr_id: u64,
        size: u32,
        dev: u16,
        qp: u16,
        opcode: u8,
        status: u8,
        is_send: bool,
        extra: u32,
    ) {
        self.log(TraceRecord {
            t_ns: 0,
            wr_id,
            size,
            dev,
            qp,
            opcode,
            is_send: u8::from(is_send),
            phase: PHASE_COMPLETED,
            status,
            extra,
        });
    }

    #[inline]
    fn log(&self, mut record: TraceRecord) {
        record.t_ns = self.now_ns();
        let index = self.ring.reserve();
        self.ring.slot(index).store(&record);
    }

    /// Nanoseconds since the context was created, from the host monotonic
    /// clock (unaffected by wall-clock adjustments).
    #[inline]
    pub fn now_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    pub fn capacity(&self) -> usize {
        self.ring.capacity()
    }

    /// Current write cursor: the total number of events ever logged.
    pub fn cursor(&self) -> u64 {
        self.ring.cursor()
    }

    /// Read-only handle to the backing slots, for tooling that wants the
    /// live buffer without going through the dump file format.
    pub fn records(&self) -> &[RecordSlot] {
        self.ring.slots()
    }

    /// Logically clear the buffer. Callers must guarantee no thread is
    /// concurrently logging.
    pub fn reset(&self) {
        self.ring.reset();
    }

    pub(crate) fn ring(&self) -> &TraceRing {
        &self.ring
    }
}

impl Default for TraceContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn post_send_populates_the_reserved_slot() {
        let ctx = TraceContext::with_capacity(8);
        ctx.post_send(0xABCD, 64, 2, 5, 1, 0x1234);

        assert_eq!(ctx.cursor(), 1);
        let record = ctx.records()[0].load();
        assert_eq!(record.wr_id, 0xABCD);
        assert_eq!(record.size, 64);
        assert_eq!(record.dev, 2);
        assert_eq!(record.qp, 5);
        assert_eq!(record.opcode, 1);
        assert_eq!(record.is_send, 1);
        assert_eq!(record.phase, PHASE_POSTED);
        assert_eq!(record.status, STATUS_NONE);
        assert_eq!(record.extra, 0x1234);
    }

    #[test]
    fn post_recv_is_marked_as_receive() {
        let ctx = TraceContext::with_capacity(8);
        ctx.post_recv(1, 4096, 0, 9, 0, 0);

        let record = ctx.records()[0].load();
        assert_eq!(record.is_send, 0);
        assert_eq!(record.phase, PHASE_POSTED);
        assert_eq!(record.status, STATUS_NONE);
    }

    #[test]
    fn complete_carries_status_and_direction() {
        let ctx = TraceContext::with_capacity(8);
        ctx.complete(1, 64, 0, 3, 0, 5, false, 0);

        let record = ctx.records()[0].load();
        assert_eq!(record.phase, PHASE_COMPLETED);
        assert_eq!(record.status, 5);
        assert_eq!(record.is_send, 0);
    }

    #[test]
    fn timestamps_are_monotonic_per_thread() {
        let ctx = TraceContext::with_capacity(8);
        ctx.post_send(1, 1, 0, 0, 0, 0);
        ctx.post_send(2, 1, 0, 0, 0, 0);
        ctx.post_send(3, 1, 0, 0, 0, 0);

        let t: Vec<u64> = (0..3).map(|i| ctx.records()[i].load().t_ns).collect();
        assert!(t[0] <= t[1]);
        assert!(t[1] <= t[2]);
    }

    #[test]
    fn concurrent_logging_accounts_for_every_event() {
        const THREADS: usize = 4;
        const PER_THREAD: usize = 500;

        let ctx = Arc::new(TraceContext::with_capacity(64));
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let ctx = ctx.clone();
                thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        ctx.post_send((t * PER_THREAD + i) as u64, 1, 0, 0, 0, 0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ctx.cursor(), (THREADS * PER_THREAD) as u64);
    }
}
