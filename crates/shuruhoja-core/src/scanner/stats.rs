/// Aggregate walk counters.
///
/// Updated concurrently by every worker with relaxed atomic increments.
/// They are advisory statistics only; no control decision reads them.
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct WalkStats {
    files: AtomicU64,
    dirs: AtomicU64,
    bytes: AtomicU64,
    errors: AtomicU64,
    skipped: AtomicU64,
}

impl WalkStats {
    pub(crate) fn record_file(&self, size: u64) {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(size, Ordering::Relaxed);
    }

    pub(crate) fn record_dir(&self) {
        self.dirs.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> WalkSnapshot {
        WalkSnapshot {
            files_scanned: self.files.load(Ordering::Relaxed),
            dirs_scanned: self.dirs.load(Ordering::Relaxed),
            total_bytes: self.bytes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalkSnapshot {
    pub files_scanned: u64,
    pub dirs_scanned: u64,
    /// Sum of non-directory sizes.
    pub total_bytes: u64,
    pub errors: u64,
    /// Entries excluded by the Path Gate.
    pub skipped: u64,
}
