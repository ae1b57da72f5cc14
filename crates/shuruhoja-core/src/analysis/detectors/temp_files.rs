/// Temporary file detector for stale scratch files left behind by editors and tools.
use crate::config::DetectionConfig;
use crate::model::size::format_size;
use crate::model::{Classification, FileKind, MetadataRecord, RiskLevel};
use chrono::{DateTime, Utc};

pub const TEMP_DIR_MARKERS: &[&str] = &["/tmp/", "/var/tmp/"];

/// Lowercase filename suffixes of scratch files.
pub const TEMP_NAME_SUFFIXES: &[&str] = &[".tmp", ".temp", ".swp", "~"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempFileDetector {
    pub max_age_days: i64,
}

impl Default for TempFileDetector {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}

impl TempFileDetector {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            max_age_days: config.temp_file_age_days,
        }
    }

    pub fn matches(record: &MetadataRecord) -> bool {
        if record.is_dir {
            return false;
        }
        let path = record.path.to_string_lossy();
        if TEMP_DIR_MARKERS.iter().any(|m| path.contains(m)) {
            return true;
        }
        let name = record.file_name().to_lowercase();
        TEMP_NAME_SUFFIXES.iter().any(|s| name.ends_with(s))
    }

    pub fn detect(&self, record: &MetadataRecord, now: DateTime<Utc>) -> Option<Classification> {
        if !Self::matches(record) {
            return None;
        }
        let age = record.age_days(now);
        if age <= self.max_age_days {
            return Some(Classification::new(FileKind::Temp, RiskLevel::Safe).with_age(age));
        }
        Some(
            Classification::new(FileKind::Temp, RiskLevel::Caution)
                .with_age(age)
                .with_reason(format!(
                    "Stale temporary file ({age} days, {})",
                    format_size(record.size)
                )),
        )
    }
}
