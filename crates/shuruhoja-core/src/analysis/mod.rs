/// Detector chain and the classification pipeline built on it.
pub mod detectors;
pub mod pipeline;

pub use detectors::{Detector, DetectorChain};
pub use pipeline::{Analysis, Analyzer, MAX_KEPT_DIAGNOSTICS};
