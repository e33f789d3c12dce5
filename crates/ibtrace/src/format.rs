//! On-disk layout of work-request trace dumps.
//!
//! A dump is a fixed header followed by `count` fixed-size records, oldest
//! first. All integers are encoded little-endian; the layout is part of the
//! stable contract between the tracer and offline tooling.

pub const DUMP_MAGIC: &[u8; 8] = b"IBTRACE\0";
pub const DUMP_VERSION: u32 = 1;

/// Encoded size of one [`TraceRecord`] in bytes.
pub const RECORD_SIZE: usize = 32;
/// Encoded size of the dump header in bytes.
pub const HEADER_SIZE: usize = 24;

/// `phase` value for a work request entering a send or receive queue.
pub const PHASE_POSTED: u8 = 0;
/// `phase` value for a completion notification.
pub const PHASE_COMPLETED: u8 = 1;
/// `status` filler for posted-phase records; only completions carry a real
/// status.
pub const STATUS_NONE: u8 = 0xff;

/// One lifecycle event of a work request.
///
/// `t_ns` is a monotonic timestamp in nanoseconds; `wr_id` is the opaque
/// work-request identifier the transport assigned; `extra` is an opaque
/// payload for transport-specific context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceRecord {
    pub t_ns: u64,
    pub wr_id: u64,
    pub size: u32,
    pub dev: u16,
    pub qp: u16,
    pub opcode: u8,
    pub is_send: u8,
    pub phase: u8,
    pub status: u8,
    pub extra: u32,
}

impl TraceRecord {
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        out[0..8].copy_from_slice(&self.t_ns.to_le_bytes());
        out[8..16].copy_from_slice(&self.wr_id.to_le_bytes());
        out[16..20].copy_from_slice(&self.size.to_le_bytes());
        out[20..22].copy_from_slice(&self.dev.to_le_bytes());
        out[22..24].copy_from_slice(&self.qp.to_le_bytes());
        out[24] = self.opcode;
        out[25] = self.is_send;
        out[26] = self.phase;
        out[27] = self.status;
        out[28..32].copy_from_slice(&self.extra.to_le_bytes());
        out
    }

    pub fn decode(bytes: &[u8; RECORD_SIZE]) -> Self {
        Self {
            t_ns: u64::from_le_bytes(bytes[0..8].try_into().unwrap()),
            wr_id: u64::from_le_bytes(bytes[8..16].try_into().unwrap()),
            size: u32::from_le_bytes(bytes[16..20].try_into().unwrap()),
            dev: u16::from_le_bytes(bytes[20..22].try_into().unwrap()),
            qp: u16::from_le_bytes(bytes[22..24].try_into().unwrap()),
            opcode: bytes[24],
            is_send: bytes[25],
            phase: bytes[26],
            status: bytes[27],
            extra: u32::from_le_bytes(bytes[28..32].try_into().unwrap()),
        }
    }
}

/// Dump header fields (the magic bytes precede these on disk).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpHeader {
    pub version: u32,
    pub record_size: u32,
    pub count: u64,
}

impl DumpHeader {
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..8].copy_from_slice(DUMP_MAGIC);
        out[8..12].copy_from_slice(&self.version.to_le_bytes());
        out[12..16].copy_from_slice(&self.record_size.to_le_bytes());
        out[16..24].copy_from_slice(&self.count.to_le_bytes());
        out
    }
}
