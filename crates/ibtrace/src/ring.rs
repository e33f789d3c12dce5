//! Wait-free ring storage for trace records.
//!
//! Any number of threads may reserve slots concurrently; the only
//! synchronization in the whole tracer is the write cursor's atomic
//! increment. Slot field accesses are individually `Relaxed` and carry no
//! ordering relative to the cursor, so a dump that overlaps a writer may
//! observe a torn record (fields from two logical events). That window is an
//! accepted cost of keeping the record path free of fences and locks.

#[cfg(all(feature = "loom", test))]
use loom::sync::atomic::{AtomicU16, AtomicU32, AtomicU64, AtomicU8};
#[cfg(not(all(feature = "loom", test)))]
use std::sync::atomic::{AtomicU16, AtomicU32, AtomicU64, AtomicU8};

use std::sync::atomic::Ordering;

use crate::format::TraceRecord;

/// One record slot, laid out field-for-field like [`TraceRecord`].
#[repr(C)]
#[derive(Debug)]
pub struct RecordSlot {
    t_ns: AtomicU64,
    wr_id: AtomicU64,
    size: AtomicU32,
    dev: AtomicU16,
    qp: AtomicU16,
    opcode: AtomicU8,
    is_send: AtomicU8,
    phase: AtomicU8,
    status: AtomicU8,
    extra: AtomicU32,
}

impl RecordSlot {
    fn zeroed() -> Self {
        Self {
            t_ns: AtomicU64::new(0),
            wr_id: AtomicU64::new(0),
            size: AtomicU32::new(0),
            dev: AtomicU16::new(0),
            qp: AtomicU16::new(0),
            opcode: AtomicU8::new(0),
            is_send: AtomicU8::new(0),
            phase: AtomicU8::new(0),
            status: AtomicU8::new(0),
            extra: AtomicU32::new(0),
        }
    }

    pub(crate) fn store(&self, record: &TraceRecord) {
        self.t_ns.store(record.t_ns, Ordering::Relaxed);
        self.wr_id.store(record.wr_id, Ordering::Relaxed);
        self.size.store(record.size, Ordering::Relaxed);
        self.dev.store(record.dev, Ordering::Relaxed);
        self.qp.store(record.qp, Ordering::Relaxed);
        self.opcode.store(record.opcode, Ordering::Relaxed);
        self.is_send.store(record.is_send, Ordering::Relaxed);
        self.phase.store(record.phase, Ordering::Relaxed);
        self.status.store(record.status, Ordering::Relaxed);
        self.extra.store(record.extra, Ordering::Relaxed);
    }

    /// Copy the slot into a plain record.
    ///
    /// May be torn if a writer is concurrently storing into the same slot.
    pub fn load(&self) -> TraceRecord {
        TraceRecord {
            t_ns: self.t_ns.load(Ordering::Relaxed),
            wr_id: self.wr_id.load(Ordering::Relaxed),
            size: self.size.load(Ordering::Relaxed),
            dev: self.dev.load(Ordering::Relaxed),
            qp: self.qp.load(Ordering::Relaxed),
            opcode: self.opcode.load(Ordering::Relaxed),
            is_send: self.is_send.load(Ordering::Relaxed),
            phase: self.phase.load(Ordering::Relaxed),
            status: self.status.load(Ordering::Relaxed),
            extra: self.extra.load(Ordering::Relaxed),
        }
    }
}

/// Fixed-capacity circular store with a monotonically increasing write
/// cursor.
///
/// The slot array is allocated once at construction and never resized. Once
/// the cursor exceeds the capacity, each reservation silently overwrites the
/// oldest record (bounded, lossy retention).
#[derive(Debug)]
pub struct TraceRing {
    slots: Box<[RecordSlot]>,
    cursor: AtomicU64,
}

impl TraceRing {
    /// `capacity` is rounded up to the next power of two (minimum 1) so
    /// slot addressing is index-and-mask.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.next_power_of_two();
        let slots: Vec<RecordSlot> = (0..capacity).map(|_| RecordSlot::zeroed()).collect();
        Self {
            slots: slots.into_boxed_slice(),
            cursor: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn mask(&self) -> u64 {
        self.slots.len() as u64 - 1
    }

    /// Reserve the next logical index.
    ///
    /// Wait-free under any number of concurrent callers: never blocks,
    /// never fails, never allocates.
    pub fn reserve(&self) -> u64 {
        self.cursor.fetch_add(1, Ordering::Relaxed)
    }

    pub fn cursor(&self) -> u64 {
        self.cursor.load(Ordering::Relaxed)
    }

    /// Slot backing logical index `index`.
    pub fn slot(&self, index: u64) -> &RecordSlot {
        &self.slots[(index & self.mask()) as usize]
    }

    pub fn slots(&self) -> &[RecordSlot] {
        &self.slots
    }

    /// Logically clear the ring by zeroing the cursor. Slot contents are
    /// left in place; they fall outside the valid window.
    ///
    /// Callers must guarantee no thread is concurrently reserving.
    pub fn reset(&self) {
        self.cursor.store(0, Ordering::SeqCst);
    }
}


#[cfg(all(test, feature = "loom"))]
mod loom_tests {
    use super::*;

    #[test]
    fn concurrent_reservations_never_collide() {
        loom::model(|| {
            let ring = loom::sync::Arc::new(TraceRing::new(4));

            let other = {
                let ring = ring.clone();
                loom::thread::spawn(move || ring.reserve())
            };
            let mine = ring.reserve();
            let theirs = other.join().unwrap();

            assert_ne!(mine, theirs);
            assert_eq!(ring.cursor(), 2);
        });
    }
}
