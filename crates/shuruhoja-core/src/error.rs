//! Error types for the walker, the pipeline, and configuration loading.
//!
//! Per-directory failures travel on the walker's error stream as
//! [`WalkError`] and never abort a scan. [`ScanError`] is the pipeline's
//! terminal status. Malformed configuration *values* are not errors at all:
//! they are logged and replaced with defaults.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A non-fatal failure encountered while walking one directory.
#[derive(Error, Debug)]
pub enum WalkError {
    /// The directory could not be listed because access was denied.
    /// Its subtree is skipped; siblings are unaffected.
    #[error("permission denied: {}: {source}", .path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other listing failure. Same recovery as `PermissionDenied`.
    #[error("failed to list {}: {source}", .path.display())]
    ListFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single entry's metadata could not be read. The entry is skipped.
    #[error("failed to read metadata for {}: {source}", .path.display())]
    EntryFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WalkError {
    /// Build the right listing error for `source`.
    pub fn listing(path: PathBuf, source: io::Error) -> Self {
        if crate::platform::is_permission_denied(&source) {
            Self::PermissionDenied { path, source }
        } else {
            Self::ListFailed { path, source }
        }
    }

    /// The path the failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied { path, .. }
            | Self::ListFailed { path, .. }
            | Self::EntryFailed { path, .. } => path,
        }
    }

    /// The underlying OS error.
    pub fn cause(&self) -> &io::Error {
        match self {
            Self::PermissionDenied { source, .. }
            | Self::ListFailed { source, .. }
            | Self::EntryFailed { source, .. } => source,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }
}

/// Terminal status of a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Cooperative shutdown was requested. Partial results are still valid.
    #[error("scan cancelled")]
    Cancelled,

    /// A walker thread could not be started.
    #[error("failed to spawn walker thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load config file {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ::config::ConfigError,
    },

    #[error("malformed config: {0}")]
    Parse(#[source] ::config::ConfigError),
}
