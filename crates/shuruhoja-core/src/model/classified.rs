/// Classification vocabulary and the per-record result type.
///
/// Risk and recommendation always travel as a consistent pair:
/// `Safe` ⇔ `Keep`, `Caution` ⇔ `Review`, `Critical` ⇔ `Delete`.
/// [`Classification::new`] derives the recommendation from the risk so
/// detectors cannot produce any other pairing.
use crate::model::MetadataRecord;
use compact_str::CompactString;
use serde::Serialize;
use std::fmt;

/// Semantic type assigned to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
    Log,
    Cache,
    Temp,
    Backup,
    Duplicate,
    Orphan,
}

impl FileKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Log => "log",
            Self::Cache => "cache",
            Self::Temp => "temp",
            Self::Backup => "backup",
            Self::Duplicate => "duplicate",
            Self::Orphan => "orphan",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Safe,
    Caution,
    Critical,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Caution => "Caution",
            Self::Critical => "Critical",
        }
    }

    /// The only recommendation allowed alongside this risk level.
    pub fn recommendation(self) -> Recommendation {
        match self {
            Self::Safe => Recommendation::Keep,
            Self::Caution => Recommendation::Review,
            Self::Critical => Recommendation::Delete,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Recommendation {
    Keep,
    Review,
    Delete,
}

impl Recommendation {
    pub fn label(self) -> &'static str {
        match self {
            Self::Keep => "Keep",
            Self::Review => "Review",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A detector's verdict for one record, before it is attached to the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: FileKind,
    pub risk: RiskLevel,
    pub recommendation: Recommendation,
    /// Empty unless the detector explains itself.
    pub reason: CompactString,
    pub duplicate_group: Option<CompactString>,
    /// Zero unless the verdict depends on age.
    pub age_days: i64,
}

impl Classification {
    pub fn new(kind: FileKind, risk: RiskLevel) -> Self {
        Self {
            kind,
            risk,
            recommendation: risk.recommendation(),
            reason: CompactString::default(),
            duplicate_group: None,
            age_days: 0,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<CompactString>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_age(mut self, age_days: i64) -> Self {
        self.age_days = age_days;
        self
    }

    pub fn with_duplicate_group(mut self, group: impl Into<CompactString>) -> Self {
        self.duplicate_group = Some(group.into());
        self
    }
}

/// One metadata record plus the classification assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedResult {
    pub record: MetadataRecord,
    pub kind: FileKind,
    pub risk: RiskLevel,
    pub recommendation: Recommendation,
    pub reason: CompactString,
    pub duplicate_group: Option<CompactString>,
    pub age_days: i64,
}

impl ClassifiedResult {
    pub fn new(record: MetadataRecord, verdict: Classification) -> Self {
        Self {
            record,
            kind: verdict.kind,
            risk: verdict.risk,
            recommendation: verdict.recommendation,
            reason: verdict.reason,
            duplicate_group: verdict.duplicate_group,
            age_days: verdict.age_days,
        }
    }

    /// Default result for a record no detector claimed: `safe/keep`,
    /// typed `file` or `directory` from the record itself.
    pub fn unclassified(record: MetadataRecord) -> Self {
        let kind = if record.is_dir {
            FileKind::Directory
        } else {
            FileKind::File
        };
        Self::new(record, Classification::new(kind, RiskLevel::Safe))
    }

    /// `true` when risk and recommendation form one of the allowed pairs.
    pub fn is_consistent(&self) -> bool {
        self.risk.recommendation() == self.recommendation
    }

    pub fn size(&self) -> u64 {
        self.record.size
    }
}
