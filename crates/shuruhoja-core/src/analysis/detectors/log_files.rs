/// Log file detector. Old logs are cleanup candidates; large old logs are critical.
use crate::config::DetectionConfig;
use crate::model::size::format_size;
use crate::model::{Classification, FileKind, MetadataRecord, RiskLevel};
use chrono::{DateTime, Utc};

/// Filename fragments (lowercase) that mark a log or rotated log.
pub const LOG_NAME_MARKERS: &[&str] = &[".log", ".log.", ".journal", ".gz", ".bz2"];

/// Path fragments for conventional log directories.
pub const LOG_DIR_MARKERS: &[&str] = &["/var/log/", "/var/logs/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFileDetector {
    /// Logs older than this many whole days are flagged.
    pub max_age_days: i64,
    /// Old logs strictly larger than this are `critical`.
    pub critical_size: u64,
}

impl Default for LogFileDetector {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}

impl LogFileDetector {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            max_age_days: config.log_file_age_days,
            critical_size: config.log_critical_size,
        }
    }

    pub fn matches(record: &MetadataRecord) -> bool {
        if record.is_dir {
            return false;
        }
        let name = record.file_name().to_lowercase();
        if LOG_NAME_MARKERS.iter().any(|m| name.contains(m)) {
            return true;
        }
        let path = record.path.to_string_lossy();
        LOG_DIR_MARKERS.iter().any(|m| path.contains(m))
    }

    pub fn detect(&self, record: &MetadataRecord, now: DateTime<Utc>) -> Option<Classification> {
        if !Self::matches(record) {
            return None;
        }

        let age = record.age_days(now);
        if age <= self.max_age_days {
            return Some(Classification::new(FileKind::Log, RiskLevel::Safe).with_age(age));
        }

        let risk = if record.size > self.critical_size {
            RiskLevel::Critical
        } else {
            RiskLevel::Caution
        };
        Some(
            Classification::new(FileKind::Log, risk)
                .with_age(age)
                .with_reason(format!(
                    "Old log file ({age} days, {})",
                    format_size(record.size)
                )),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Recommendation;
    use chrono::Duration;

    const MIB: u64 = 1024 * 1024;

    fn log(path: &str, size: u64, days_old: i64, now: DateTime<Utc>) -> MetadataRecord {
        MetadataRecord::new(path, size, false, now - Duration::days(days_old))
    }

    #[test]
    fn large_old_rotated_log_is_critical() {
        let now = Utc::now();
        let record = log("/var/log/app.log.1.gz", 200 * MIB, 45, now);
        let verdict = LogFileDetector::default().detect(&record, now).unwrap();

        assert_eq!(verdict.kind, FileKind::Log);
        assert_eq!(verdict.risk, RiskLevel::Critical);
        assert_eq!(verdict.recommendation, Recommendation::Delete);
        assert_eq!(verdict.age_days, 45);
        assert!(verdict.reason.contains("45 days"), "{}", verdict.reason);
        assert!(verdict.reason.contains("200.0 MB"), "{}", verdict.reason);
    }

    #[test]
    fn small_old_log_needs_review() {
        let now = Utc::now();
        let record = log("/srv/app/debug.log", 3 * MIB, 60, now);
        let verdict = LogFileDetector::default().detect(&record, now).unwrap();
        assert_eq!(verdict.risk, RiskLevel::Caution);
        assert_eq!(verdict.recommendation, Recommendation::Review);
        assert_eq!(verdict.reason, "Old log file (60 days, 3.0 MB)");
    }

    #[test]
    fn recent_log_is_safe_without_reason() {
        let now = Utc::now();
        let record = log("/var/log/app.log", 5 * MIB, 10, now);
        let verdict = LogFileDetector::default().detect(&record, now).unwrap();
        assert_eq!(verdict.kind, FileKind::Log);
        assert_eq!(verdict.risk, RiskLevel::Safe);
        assert_eq!(verdict.recommendation, Recommendation::Keep);
        assert!(verdict.reason.is_empty());
        assert_eq!(verdict.age_days, 10);
    }

    #[test]
    fn threshold_is_exclusive() {
        let now = Utc::now();
        let detector = LogFileDetector::default();
        let at = log("/var/log/syslog", MIB, 30, now);
        let past = log("/var/log/syslog", MIB, 31, now);
        assert_eq!(detector.detect(&at, now).unwrap().risk, RiskLevel::Safe);
        assert_eq!(detector.detect(&past, now).unwrap().risk, RiskLevel::Caution);
    }

    #[test]
    fn critical_size_is_strictly_greater() {
        let now = Utc::now();
        let detector = LogFileDetector::default();
        let exact = log("/var/log/big.log", 100 * MIB, 90, now);
        assert_eq!(detector.detect(&exact, now).unwrap().risk, RiskLevel::Caution);
        let over = log("/var/log/big.log", 100 * MIB + 1, 90, now);
        assert_eq!(detector.detect(&over, now).unwrap().risk, RiskLevel::Critical);
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let now = Utc::now();
        let record = log("/home/u/BUILD.LOG", 1, 1, now);
        assert!(LogFileDetector::matches(&record));
        let journal = log("/home/u/system@0001.journal", 1, 1, now);
        assert!(LogFileDetector::matches(&journal));
    }

    #[test]
    fn directories_and_unrelated_files_are_ignored() {
        let now = Utc::now();
        let dir = MetadataRecord::new("/var/log/nginx", 4096, true, now);
        assert!(LogFileDetector::default().detect(&dir, now).is_none());
        let plain = log("/home/u/notes.txt", 1024, 400, now);
        assert!(LogFileDetector::default().detect(&plain, now).is_none());
    }

    #[test]
    fn configured_age_threshold_applies() {
        let now = Utc::now();
        let detector = LogFileDetector {
            max_age_days: 7,
            critical_size: MIB,
        };
        let record = log("/var/logs/app/out", 2 * MIB, 8, now);
        assert_eq!(detector.detect(&record, now).unwrap().risk, RiskLevel::Critical);
    }
}
