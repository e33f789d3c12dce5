//! No-op rendition of the tracer, selected when the `capture` feature is
//! off.
//!
//! The public surface matches the real implementation so host code compiles
//! unchanged, but every entry point is an empty inline function (nothing is
//! generated at call sites), no buffer memory is allocated, introspection
//! reports a zero-capacity buffer, and dump operations touch no files.

use std::io::{self, Write};
use std::path::Path;

use crate::format::TraceRecord;

/// Slot placeholder so introspection keeps one signature across both
/// builds. No instance exists in a disabled build.
#[derive(Debug)]
pub struct RecordSlot {
    _private: (),
}

impl RecordSlot {
    pub fn load(&self) -> TraceRecord {
        TraceRecord::default()
    }
}

#[derive(Debug, Default)]
pub struct TraceContext;

impl TraceContext {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    #[inline]
    pub fn with_capacity(_capacity: usize) -> Self {
        Self
    }

    #[inline]
    pub fn post_send(&self, _wr_id: u64, _size: u32, _dev: u16, _qp: u16, _opcode: u8, _extra: u32) {
    }

    #[inline]
    pub fn post_recv(&self, _wr_id: u64, _size: u32, _dev: u16, _qp: u16, _opcode: u8, _extra: u32) {
    }

    #[inline]
    #[allow(clippy::too_many_arguments)]
    pub fn complete(
        &self,
        _wr_id: u64,
        _size: u32,
        _dev: u16,
        _qp: u16,
        _opcode: u8,
        _status: u8,
        _is_send: bool,
        _extra: u32,
    ) {
    }

    #[inline]
    pub fn now_ns(&self) -> u64 {
        0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        0
    }

    #[inline]
    pub fn cursor(&self) -> u64 {
        0
    }

    #[inline]
    pub fn records(&self) -> &[RecordSlot] {
        &[]
    }

    #[inline]
    pub fn reset(&self) {}

    #[inline]
    pub fn write_dump<W: Write>(&self, _w: &mut W) -> io::Result<()> {
        Ok(())
    }

    #[inline]
    pub fn dump_to_file<P: AsRef<Path>>(&self, _path: P) -> io::Result<()> {
        Ok(())
    }

    #[inline]
    pub fn dump_from_env(&self, _name: &str) -> io::Result<()> {
        Ok(())
    }

    #[inline]
    pub fn shutdown(&self) {}
}
