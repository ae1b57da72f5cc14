/// Classification pipeline: the single consumer of a walk.
///
/// Drains both walker streams, classifies every record exactly once,
/// logs every diagnostic, and sorts the collected results by size
/// descending once the streams close (or the scan is cancelled).
use crate::analysis::detectors::DetectorChain;
use crate::config::ScanConfig;
use crate::error::{ScanError, WalkError};
use crate::model::{ClassifiedResult, MetadataRecord, ScanSummary};
use crate::scanner::{CancelToken, ConcurrentWalker, WalkSnapshot};
use chrono::Utc;
use crossbeam_channel::select;
use rayon::slice::ParallelSliceMut;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Diagnostics kept verbatim; the rest are only counted.
pub const MAX_KEPT_DIAGNOSTICS: usize = 1_000;

/// Everything one scan produced.
#[derive(Debug)]
pub struct Analysis {
    /// Size-descending. Partial when `outcome` is `Err(Cancelled)`.
    pub results: Vec<ClassifiedResult>,
    pub stats: WalkSnapshot,
    pub diagnostics: Vec<WalkError>,
    /// Total diagnostics received, including those not kept.
    pub diagnostic_count: u64,
    pub duration: Duration,
    pub outcome: Result<(), ScanError>,
}

impl Analysis {
    pub fn is_complete(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.outcome, Err(ScanError::Cancelled))
    }

    pub fn summary(&self) -> ScanSummary {
        ScanSummary::from_results(&self.results).with_duration(self.duration)
    }
}

enum Step {
    Record(MetadataRecord),
    Diagnostic(WalkError),
    RecordsClosed,
    ErrorsClosed,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    walker: ConcurrentWalker,
    chain: DetectorChain,
}

impl Analyzer {
    pub fn new(walker: ConcurrentWalker, chain: DetectorChain) -> Self {
        Self { walker, chain }
    }

    /// Walker and shipped detector chain for `config`, timed from now.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(
            ConcurrentWalker::from_config(config),
            DetectorChain::from_config(&config.detection, Utc::now()),
        )
    }

    pub fn chain(&self) -> &DetectorChain {
        &self.chain
    }

    /// Scan `root` and classify everything found.
    ///
    /// Only a failure to start the walk is returned as `Err`. Cancellation
    /// is reported through [`Analysis::outcome`] next to the partial results.
    pub fn analyze(&self, cancel: &CancelToken, root: impl Into<PathBuf>) -> Result<Analysis, ScanError> {
        self.analyze_with(cancel, root, |_| {})
    }

    /// Like [`analyze`](Self::analyze), calling `observe` on every result
    /// as it is classified.
    pub fn analyze_with<F>(
        &self,
        cancel: &CancelToken,
        root: impl Into<PathBuf>,
        mut observe: F,
    ) -> Result<Analysis, ScanError>
    where
        F: FnMut(&ClassifiedResult),
    {
        let root = root.into();
        let start = Instant::now();
        let streams = self.walker.scan(cancel, root.clone())?;

        let mut records = streams.records.clone();
        let mut errors = streams.errors.clone();
        let (mut records_open, mut errors_open) = (true, true);

        let mut results = Vec::new();
        let mut diagnostics = Vec::new();
        let mut diagnostic_count = 0u64;

        let outcome = loop {
            if cancel.is_cancelled() {
                break Err(ScanError::Cancelled);
            }
            if !records_open && !errors_open {
                break Ok(());
            }

            let step = select! {
                recv(records) -> msg => msg.map_or(Step::RecordsClosed, Step::Record),
                recv(errors) -> msg => msg.map_or(Step::ErrorsClosed, Step::Diagnostic),
                recv(cancel.signal()) -> _ => Step::Cancelled,
            };

            match step {
                Step::Record(record) => {
                    let result = self.chain.classify(record);
                    observe(&result);
                    results.push(result);
                }
                Step::Diagnostic(err) => {
                    warn!(path = %err.path().display(), error = %err.cause(), "{}", diagnostic_label(&err));
                    diagnostic_count += 1;
                    if diagnostics.len() < MAX_KEPT_DIAGNOSTICS {
                        diagnostics.push(err);
                    }
                }
                Step::RecordsClosed => {
                    records_open = false;
                    records = crossbeam_channel::never();
                }
                Step::ErrorsClosed => {
                    errors_open = false;
                    errors = crossbeam_channel::never();
                }
                Step::Cancelled => break Err(ScanError::Cancelled),
            }
        };

        let stats = streams.stats();
        drop(records);
        drop(errors);
        if outcome.is_ok() {
            streams.join();
        } else {
            // Workers see the token and wind down on their own.
            drop(streams);
        }

        results.par_sort_by(|a, b| b.record.size.cmp(&a.record.size));
        let duration = start.elapsed();

        match &outcome {
            Ok(()) => info!(
                root = %root.display(),
                results = results.len(),
                diagnostics = diagnostic_count,
                "Scan complete in {duration:?}"
            ),
            Err(e) => info!(
                root = %root.display(),
                results = results.len(),
                "Scan stopped early ({e}); keeping partial results"
            ),
        }
        debug!(?stats, "Walk statistics");

        Ok(Analysis {
            results,
            stats,
            diagnostics,
            diagnostic_count,
            duration,
            outcome,
        })
    }
}

fn diagnostic_label(err: &WalkError) -> &'static str {
    match err {
        WalkError::PermissionDenied { .. } => "Permission denied; skipping subtree",
        WalkError::ListFailed { .. } => "Could not list directory; skipping subtree",
        WalkError::EntryFailed { .. } => "Could not read entry metadata; skipping entry",
    }
}
