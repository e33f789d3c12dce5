#![cfg(feature = "capture")]

use ibtrace::format::{
    DUMP_VERSION, HEADER_SIZE, PHASE_COMPLETED, PHASE_POSTED, RECORD_SIZE, STATUS_NONE,
};
use ibtrace::{DumpFile, TraceContext};

#[test]
fn posted_then_completed_round_trips_through_a_dump_file() {
    let ctx = TraceContext::with_capacity(64);
    ctx.post_send(1, 64, 0, 3, 0, 0);
    ctx.complete(1, 64, 0, 3, 0, 0, true, 0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wr.ibtrace");
    ctx.dump_to_file(&path).unwrap();

    let len = std::fs::metadata(&path).unwrap().len();
    assert_eq!(len, (HEADER_SIZE + 2 * RECORD_SIZE) as u64);

    let dump = DumpFile::open(&path).unwrap();
    assert_eq!(dump.header.version, DUMP_VERSION);
    assert_eq!(dump.header.record_size, RECORD_SIZE as u32);
    assert_eq!(dump.header.count, 2);

    let posted = dump.records[0];
    assert_eq!(posted.phase, PHASE_POSTED);
    assert_eq!(posted.wr_id, 1);
    assert_eq!(posted.size, 64);
    assert_eq!(posted.qp, 3);
    assert_eq!(posted.is_send, 1);
    assert_eq!(posted.status, STATUS_NONE);

    let completed = dump.records[1];
    assert_eq!(completed.phase, PHASE_COMPLETED);
    assert_eq!(completed.wr_id, 1);
    assert_eq!(completed.status, 0);
    assert_eq!(completed.is_send, 1);
    assert!(completed.t_ns >= posted.t_ns);
}

#[test]
fn wrapped_ring_round_trips_the_most_recent_window() {
    let ctx = TraceContext::with_capacity(8);
    for wr_id in 0..20u64 {
        ctx.post_recv(wr_id, 4096, 1, 2, 0, 0);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wrapped.ibtrace");
    ctx.dump_to_file(&path).unwrap();

    let dump = DumpFile::open(&path).unwrap();
    assert_eq!(dump.header.count, 8);
    let ids: Vec<u64> = dump.records.iter().map(|r| r.wr_id).collect();
    assert_eq!(ids, (12..20).collect::<Vec<u64>>());
}

#[test]
fn reset_then_dump_yields_an_empty_file_body() {
    let ctx = TraceContext::with_capacity(8);
    for wr_id in 0..5u64 {
        ctx.post_send(wr_id, 1, 0, 0, 0, 0);
    }
    ctx.reset();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reset.ibtrace");
    ctx.dump_to_file(&path).unwrap();

    assert_eq!(
        std::fs::metadata(&path).unwrap().len(),
        HEADER_SIZE as u64
    );
    let dump = DumpFile::open(&path).unwrap();
    assert_eq!(dump.header.count, 0);
    assert!(dump.records.is_empty());
}

#[test]
fn concurrent_writers_leave_an_exact_event_total() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 250;

    let ctx = std::sync::Arc::new(TraceContext::with_capacity(4096));
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let ctx = ctx.clone();
            std::thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let wr_id = (t * PER_THREAD + i) as u64;
                    ctx.post_send(wr_id, 64, 0, t as u16, 0, 0);
                    ctx.complete(wr_id, 64, 0, t as u16, 0, 0, true, 0);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(ctx.cursor(), (THREADS * PER_THREAD * 2) as u64);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concurrent.ibtrace");
    ctx.dump_to_file(&path).unwrap();

    let dump = DumpFile::open(&path).unwrap();
    assert_eq!(dump.header.count, (THREADS * PER_THREAD * 2) as u64);
}
