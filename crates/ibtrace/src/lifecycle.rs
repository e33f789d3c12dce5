//! One-time configuration announcement and the explicit end-of-run hook.

use std::sync::Once;

use crate::recorder::TraceContext;
use crate::TRACE_FILE_ENV;

static ANNOUNCE: Once = Once::new();

/// Log the capture configuration the first time any context is created.
///
/// The latch is process-wide and safe under concurrent first construction;
/// later contexts stay silent.
pub(crate) fn announce_config(ctx: &TraceContext) {
    ANNOUNCE.call_once(|| match std::env::var(TRACE_FILE_ENV) {
        Ok(path) if !path.is_empty() => {
            tracing::info!(
                "ibtrace: capture enabled, ring capacity {} records, {}=\"{}\"",
                ctx.capacity(),
                TRACE_FILE_ENV,
                path
            );
        }
        _ => {
            tracing::info!(
                "ibtrace: capture compiled in but {} not set; no dump will be written on shutdown",
                TRACE_FILE_ENV
            );
        }
    });
}

impl TraceContext {
    /// End-of-run hook: write the dump configured through
    /// [`TRACE_FILE_ENV`], if any.
    ///
    /// The host calls this deterministically before exit (there is no
    /// static-destructor magic). Failure to write is logged and swallowed;
    /// this path never panics and never propagates an error into teardown.
    pub fn shutdown(&self) {
        if let Err(err) = self.dump_from_env(TRACE_FILE_ENV) {
            tracing::warn!("ibtrace: final dump failed: {err}");
        }
    }
}
