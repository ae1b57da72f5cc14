/// Shuru Hoja Core — concurrent tree walk, classification, and data model.
///
/// This crate contains all scanning and classification logic with zero
/// presentation dependencies. Rendering, colour, and argument parsing live
/// in `shuruhoja-cli`.
///
/// # Modules
///
/// - [`model`] — Metadata records, classified results, summary reduction.
/// - [`gate`] — Path Gate deciding which paths are never traversed.
/// - [`scanner`] — Bounded-parallelism directory walker and cancellation.
/// - [`analysis`] — Detector chain and the single-consumer classification pipeline.
/// - [`platform`] — OS-specific metadata extraction and permission helpers.
/// - [`config`] — Immutable scan configuration and its INI-style loader.
/// - [`error`] — Error taxonomy shared by the walker and pipeline.
pub mod analysis;
pub mod config;
pub mod error;
pub mod gate;
pub mod model;
pub mod platform;
pub mod scanner;

pub use analysis::{Analysis, Analyzer, DetectorChain};
pub use config::ScanConfig;
pub use error::{ConfigError, ScanError, WalkError};
pub use gate::PathGate;
pub use model::{ClassifiedResult, MetadataRecord, ScanSummary};
pub use scanner::{CancelToken, ConcurrentWalker};
