//! Validating reader for dump files.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use thiserror::Error;

use crate::format::{
    DumpHeader, TraceRecord, DUMP_MAGIC, DUMP_VERSION, HEADER_SIZE, RECORD_SIZE,
};

#[derive(Debug, Error)]
pub enum DumpReadError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid dump magic")]
    InvalidMagic,

    #[error("unsupported dump version {0}")]
    UnsupportedVersion(u32),

    #[error("unexpected record size {0}")]
    UnsupportedRecordSize(u32),

    #[error("dump truncated: header promises more records than the file holds")]
    Truncated,
}

/// A fully parsed dump file.
#[derive(Debug, Clone)]
pub struct DumpFile {
    pub header: DumpHeader,
    /// Records in file order, oldest first.
    pub records: Vec<TraceRecord>,
}

impl DumpFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DumpReadError> {
        let file = File::open(path)?;
        read_dump(BufReader::new(file))
    }
}

/// Read and validate a dump.
///
/// `Read + Seek` lets the header's record count be checked against the
/// actual stream length before anything is allocated; the count is
/// untrusted input.
pub fn read_dump<R: Read + Seek>(mut r: R) -> Result<DumpFile, DumpReadError> {
    let stream_len = r.seek(SeekFrom::End(0))?;
    r.seek(SeekFrom::Start(0))?;

    let mut magic = [0u8; 8];
    r.read_exact(&mut magic)?;
    if &magic != DUMP_MAGIC {
        return Err(DumpReadError::InvalidMagic);
    }

    let version = read_u32(&mut r)?;
    if version != DUMP_VERSION {
        return Err(DumpReadError::UnsupportedVersion(version));
    }

    let record_size = read_u32(&mut r)?;
    if record_size as usize != RECORD_SIZE {
        return Err(DumpReadError::UnsupportedRecordSize(record_size));
    }

    let count = read_u64(&mut r)?;
    let payload = count
        .checked_mul(RECORD_SIZE as u64)
        .ok_or(DumpReadError::Truncated)?;
    let end = (HEADER_SIZE as u64)
        .checked_add(payload)
        .ok_or(DumpReadError::Truncated)?;
    if end > stream_len {
        return Err(DumpReadError::Truncated);
    }

    let mut records = Vec::with_capacity(count as usize);
    let mut buf = [0u8; RECORD_SIZE];
    for _ in 0..count {
        r.read_exact(&mut buf)?;
        records.push(TraceRecord::decode(&buf));
    }

    Ok(DumpFile {
        header: DumpHeader {
            version,
            record_size,
            count,
        },
        records,
    })
}

fn read_u32<R: Read>(r: &mut R) -> Result<u32, DumpReadError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_u64<R: Read>(r: &mut R) -> Result<u64, DumpReadError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}
