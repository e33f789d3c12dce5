#![forbid(unsafe_code)]

//! In-process work-request tracer for an RDMA-style transport.
//!
//! Worker threads record post-send / post-receive / completion events into a
//! fixed-capacity lock-free ring owned by a [`TraceContext`]; a dump
//! serializes the most recent window, oldest first, into a small
//! self-describing binary file (see [`format`]) that [`DumpFile`] and the
//! `ibtrace-inspect` tool read back.
//!
//! Capture is selected at build time by the `capture` feature (on by
//! default). Without it every entry point is an empty inline function, no
//! buffer is allocated, and introspection reports capacity 0, so the calls
//! can stay embedded unconditionally in a transport hot path.

pub mod format;
mod reader;

#[cfg(feature = "capture")]
mod lifecycle;
#[cfg(feature = "capture")]
mod recorder;
#[cfg(feature = "capture")]
mod ring;
#[cfg(feature = "capture")]
mod writer;

#[cfg(not(feature = "capture"))]
mod disabled;

pub use crate::reader::{read_dump, DumpFile, DumpReadError};

#[cfg(feature = "capture")]
pub use crate::recorder::TraceContext;
#[cfg(feature = "capture")]
pub use crate::ring::RecordSlot;

#[cfg(not(feature = "capture"))]
pub use crate::disabled::{RecordSlot, TraceContext};

/// Default ring capacity: 1M records, 32 MiB of slot storage.
pub const DEFAULT_CAPACITY: usize = 1 << 20;

/// Environment variable naming the automatic shutdown dump path.
///
/// Unset or empty means the shutdown dump is disabled.
pub const TRACE_FILE_ENV: &str = "IBTRACE_FILE";
