/// Detector chain — ordered classification rules, first match wins.
///
/// Each [`Detector`] looks only at the metadata already captured in a
/// [`MetadataRecord`]; none touch the filesystem. The chain fixes "now"
/// when it is built, so classifying the same record twice always gives
/// the same answer.
pub mod cache_files;
pub mod log_files;
pub mod temp_files;

pub use cache_files::CacheFileDetector;
pub use log_files::LogFileDetector;
pub use temp_files::TempFileDetector;

use crate::config::DetectionConfig;
use crate::model::{Classification, ClassifiedResult, MetadataRecord};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

/// Signature of a caller-supplied rule.
pub type DetectFn = dyn Fn(&MetadataRecord, DateTime<Utc>) -> Option<Classification> + Send + Sync;

/// One member of the chain.
#[derive(Clone)]
pub enum Detector {
    LogFiles(LogFileDetector),
    CacheFiles(CacheFileDetector),
    TempFiles(TempFileDetector),
    Custom {
        name: &'static str,
        detect: Arc<DetectFn>,
    },
}

impl Detector {
    pub fn custom<F>(name: &'static str, detect: F) -> Self
    where
        F: Fn(&MetadataRecord, DateTime<Utc>) -> Option<Classification> + Send + Sync + 'static,
    {
        Self::Custom {
            name,
            detect: Arc::new(detect),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LogFiles(_) => "log-files",
            Self::CacheFiles(_) => "cache-files",
            Self::TempFiles(_) => "temp-files",
            Self::Custom { name, .. } => *name,
        }
    }

    pub fn detect(&self, record: &MetadataRecord, now: DateTime<Utc>) -> Option<Classification> {
        match self {
            Self::LogFiles(d) => d.detect(record, now),
            Self::CacheFiles(d) => d.detect(record),
            Self::TempFiles(d) => d.detect(record, now),
            Self::Custom { detect, .. } => detect(record, now),
        }
    }
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogFiles(d) => f.debug_tuple("LogFiles").field(d).finish(),
            Self::CacheFiles(d) => f.debug_tuple("CacheFiles").field(d).finish(),
            Self::TempFiles(d) => f.debug_tuple("TempFiles").field(d).finish(),
            Self::Custom { name, .. } => f.debug_struct("Custom").field("name", name).finish_non_exhaustive(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectorChain {
    detectors: Vec<Detector>,
    now: DateTime<Utc>,
}

impl DetectorChain {
    /// An empty chain: every record gets the default classification.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            detectors: Vec::new(),
            now,
        }
    }

    /// The shipped chain, in order: log files, cache files, temp files.
    pub fn from_config(config: &DetectionConfig, now: DateTime<Utc>) -> Self {
        Self::empty(now)
            .with(Detector::LogFiles(LogFileDetector::from_config(config)))
            .with(Detector::CacheFiles(CacheFileDetector::from_config(config)))
            .with(Detector::TempFiles(TempFileDetector::from_config(config)))
    }

    /// Append a detector; it is consulted after every existing one.
    pub fn with(mut self, detector: Detector) -> Self {
        self.push(detector);
        self
    }

    pub fn push(&mut self, detector: Detector) {
        self.detectors.push(detector);
    }

    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The first detector verdict, if any detector claims the record.
    pub fn detect(&self, record: &MetadataRecord) -> Option<Classification> {
        self.detectors
            .iter()
            .find_map(|d| d.detect(record, self.now))
            .map(|mut verdict| {
                verdict.recommendation = verdict.risk.recommendation();
                verdict
            })
    }

    /// Exactly one result per record.
    pub fn classify(&self, record: MetadataRecord) -> ClassifiedResult {
        match self.detect(&record) {
            Some(verdict) => ClassifiedResult::new(record, verdict),
            None => ClassifiedResult::unclassified(record),
        }
    }
}
