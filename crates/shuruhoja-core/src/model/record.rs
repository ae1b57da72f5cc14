/// A single filesystem entry's attributes, captured once at scan time.
///
/// Records are immutable after the walker creates them. Identity is the
/// path: each entry is visited exactly once per scan.
use crate::platform::{self, Ownership};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;
use std::fs::Metadata;
use std::path::PathBuf;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    /// Absolute path of the entry.
    pub path: PathBuf,
    /// Logical size in bytes. Directories report the size of the
    /// directory inode itself, not their contents.
    pub size: u64,
    pub is_dir: bool,
    /// Raw permission and file-type bits (`st_mode` on Unix).
    pub mode: u32,
    pub modified: DateTime<Utc>,
    pub accessed: DateTime<Utc>,
    pub uid: u32,
    pub gid: u32,
    pub hard_links: u64,
    pub inode: u64,
}

impl MetadataRecord {
    /// Build a record from `symlink_metadata`-style metadata.
    ///
    /// Symbolic links are never followed, so a link to a directory
    /// produces a non-directory record.
    pub fn from_metadata(path: PathBuf, meta: &Metadata) -> Self {
        let Ownership {
            mode,
            uid,
            gid,
            hard_links,
            inode,
        } = platform::ownership(meta);

        Self {
            path,
            size: meta.len(),
            is_dir: meta.is_dir(),
            mode,
            modified: to_utc(meta.modified().ok()),
            accessed: to_utc(meta.accessed().ok()),
            uid,
            gid,
            hard_links,
            inode,
        }
    }

    /// Construct a record without touching the filesystem.
    ///
    /// Ownership fields are zeroed and the access time mirrors `modified`.
    pub fn new(path: impl Into<PathBuf>, size: u64, is_dir: bool, modified: DateTime<Utc>) -> Self {
        Self {
            path: path.into(),
            size,
            is_dir,
            mode: 0,
            modified,
            accessed: modified,
            uid: 0,
            gid: 0,
            hard_links: 1,
            inode: 0,
        }
    }

    /// Final path component, lossily decoded. Empty for `/`.
    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or(Cow::Borrowed(""))
    }

    /// Whole days elapsed between `modified` and `now`, truncated toward zero.
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.modified).num_days()
    }
}

fn to_utc(time: Option<SystemTime>) -> DateTime<Utc> {
    time.map(DateTime::<Utc>::from)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
