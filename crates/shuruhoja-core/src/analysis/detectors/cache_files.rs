/// Cache file detector.
use crate::config::DetectionConfig;
use crate::model::size::format_size;
use crate::model::{Classification, FileKind, MetadataRecord, RiskLevel};

pub const CACHE_DIR_MARKERS: &[&str] = &["/.cache/", "/var/cache/", "/Library/Caches/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheFileDetector {
    /// Cache files at least this large are flagged for review.
    pub min_size: u64,
}

impl Default for CacheFileDetector {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}

impl CacheFileDetector {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            min_size: config.cache_min_size,
        }
    }

    pub fn matches(record: &MetadataRecord) -> bool {
        if record.is_dir {
            return false;
        }
        let path = record.path.to_string_lossy();
        CACHE_DIR_MARKERS.iter().any(|m| path.contains(m))
    }

    pub fn detect(&self, record: &MetadataRecord) -> Option<Classification> {
        if !Self::matches(record) {
            return None;
        }
        if record.size < self.min_size {
            return Some(Classification::new(FileKind::Cache, RiskLevel::Safe));
        }
        Some(
            Classification::new(FileKind::Cache, RiskLevel::Caution)
                .with_reason(format!("Large cache file ({})", format_size(record.size))),
        )
    }
}
