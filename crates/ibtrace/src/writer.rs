//! Dump serialization: a consistent window of recent records to a file.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::format::{DumpHeader, DUMP_VERSION, RECORD_SIZE};
use crate::recorder::TraceContext;

impl TraceContext {
    /// Serialize the valid window of the ring, oldest record first.
    ///
    /// The write cursor is read exactly once; the window is the most recent
    /// `min(cursor, capacity)` records. Threads that keep logging while the
    /// window is serialized may overwrite slots inside it, so individual
    /// records in the output can be torn. The dump is a best-effort
    /// diagnostic, not a transactional capture.
    pub fn write_dump<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let write_index = self.cursor();
        let count = write_index.min(self.capacity() as u64);
        let start = write_index - count;

        let header = DumpHeader {
            version: DUMP_VERSION,
            record_size: RECORD_SIZE as u32,
            count,
        };
        w.write_all(&header.encode())?;

        for i in 0..count {
            let record = self.ring().slot(start + i).load();
            w.write_all(&record.encode())?;
        }
        Ok(())
    }

    /// Write a dump file at `path`, replacing any existing file.
    ///
    /// I/O failure is reported through the ordinary `io::Result` and may
    /// leave a partial file behind; there is no atomic rename and no fsync.
    pub fn dump_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        self.write_dump(&mut w)?;
        w.flush()
    }

    /// Dump to the path named by the environment variable `name`.
    ///
    /// An absent or empty variable means dumping was not requested: no
    /// filesystem operation happens and the call succeeds.
    pub fn dump_from_env(&self, name: &str) -> io::Result<()> {
        let Ok(path) = std::env::var(name) else {
            return Ok(());
        };
        if path.is_empty() {
            return Ok(());
        }
        self.dump_to_file(path)
    }
}
