#![forbid(unsafe_code)]

//! Offline inspector for ibtrace dump files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ibtrace::format::{TraceRecord, PHASE_COMPLETED, PHASE_POSTED, STATUS_NONE};
use ibtrace::DumpFile;

#[derive(Debug, Parser)]
#[command(about = "Print the contents of an ibtrace dump file")]
struct Args {
    /// Dump file written by the tracer (see the IBTRACE_FILE variable).
    dump: PathBuf,

    /// Print at most this many records.
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let dump = DumpFile::open(&args.dump)
        .with_context(|| format!("failed to read {}", args.dump.display()))?;

    println!(
        "{}: version {}, {} records ({} bytes each)",
        args.dump.display(),
        dump.header.version,
        dump.header.count,
        dump.header.record_size,
    );

    let base_ns = dump.records.first().map_or(0, |r| r.t_ns);
    let shown = args
        .limit
        .unwrap_or(dump.records.len())
        .min(dump.records.len());
    for (i, record) in dump.records[..shown].iter().enumerate() {
        println!("{:>8} {}", i, describe(record, base_ns));
    }
    if shown < dump.records.len() {
        println!("... {} more records", dump.records.len() - shown);
    }

    Ok(())
}

fn describe(record: &TraceRecord, base_ns: u64) -> String {
    let phase = match record.phase {
        PHASE_POSTED => "post",
        PHASE_COMPLETED => "comp",
        _ => "????",
    };
    let dir = if record.is_send != 0 { "send" } else { "recv" };
    let status = if record.phase == PHASE_POSTED && record.status == STATUS_NONE {
        "-".to_string()
    } else {
        record.status.to_string()
    };
    format!(
        "+{:>12}ns {} {} wr_id={:#018x} dev={} qp={} op={} size={} status={} extra={:#010x}",
        record.t_ns.saturating_sub(base_ns),
        phase,
        dir,
        record.wr_id,
        record.dev,
        record.qp,
        record.opcode,
        record.size,
        status,
        record.extra,
    )
}
