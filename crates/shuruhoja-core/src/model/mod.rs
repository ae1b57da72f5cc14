/// Data model shared by the walker, the pipeline, and the report layer.
pub mod classified;
pub mod record;
pub mod size;
pub mod summary;

pub use classified::{Classification, ClassifiedResult, FileKind, Recommendation, RiskLevel};
pub use record::MetadataRecord;
pub use summary::ScanSummary;
