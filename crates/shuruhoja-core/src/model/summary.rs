/// Scan summary, a pure reduction over classified results.
use crate::model::{ClassifiedResult, Recommendation, RiskLevel};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub total_bytes: u64,
    pub total_files: u64,
    pub total_dirs: u64,
    /// Sum of sizes recommended for deletion.
    pub potential_cleanup: u64,
    pub critical_count: u64,
    pub caution_count: u64,
    pub duration: Duration,
}

impl ScanSummary {
    /// Reduce `results` into totals. Recomputable at any time; the
    /// duration is left at zero.
    pub fn from_results(results: &[ClassifiedResult]) -> Self {
        let mut summary = Self::default();
        for r in results {
            summary.total_bytes += r.record.size;
            if r.record.is_dir {
                summary.total_dirs += 1;
            } else {
                summary.total_files += 1;
            }
            if r.recommendation == Recommendation::Delete {
                summary.potential_cleanup += r.record.size;
            }
            match r.risk {
                RiskLevel::Critical => summary.critical_count += 1,
                RiskLevel::Caution => summary.caution_count += 1,
                RiskLevel::Safe => {}
            }
        }
        summary
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}
