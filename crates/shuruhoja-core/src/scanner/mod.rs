/// Scanner module — the concurrent tree walker.
///
/// A scan runs on a fixed set of worker threads pulling directories from a
/// shared queue. Each worker is one traversal permit, so at most
/// `max_workers` directory listings are in flight. Results flow out over
/// two bounded crossbeam channels:
///
/// - **records**: one [`MetadataRecord`](crate::model::MetadataRecord) per entry, unordered.
/// - **errors**: one [`WalkError`](crate::error::WalkError) per unreadable directory or entry.
///
/// Both channels close only when the whole walk has finished or been
/// cancelled. Consumers must drain both until closed.
pub mod cancel;
pub mod stats;
pub mod walker;

pub use cancel::CancelToken;
pub use stats::{WalkSnapshot, WalkStats};
pub use walker::{ConcurrentWalker, WalkOptions, WalkStreams};

use tracing::warn;

/// Default ceiling on concurrent directory listings.
pub const DEFAULT_MAX_WORKERS: usize = 100;

/// Hard upper bound on walker threads, whatever the config or flags ask for.
pub const MAX_WORKERS_LIMIT: usize = 1_024;

/// Clamp a requested worker count into `1..=MAX_WORKERS_LIMIT`.
pub fn clamp_workers(requested: usize) -> usize {
    if requested > MAX_WORKERS_LIMIT {
        warn!(
            requested,
            limit = MAX_WORKERS_LIMIT,
            "Worker count too large, clamping"
        );
        return MAX_WORKERS_LIMIT;
    }
    requested.max(1)
}

/// Default capacity of the record channel.
///
/// Once full, workers block on send, which in turn stops them from listing
/// further directories. This bounds buffered memory independently of the
/// worker ceiling.
pub const RECORD_CHANNEL_CAPACITY: usize = 10_000;

/// Default capacity of the error channel.
pub const ERROR_CHANNEL_CAPACITY: usize = 100;
