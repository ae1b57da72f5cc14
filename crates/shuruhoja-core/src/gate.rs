//! Path Gate — decides which paths are never traversed or emitted.
//!
//! Two independent checks, either of which excludes a path:
//!
//! 1. **Skip list**: exact or component-prefix match against absolute
//!    paths (`/proc` excludes `/proc` and `/proc/1/status`, but not
//!    `/process`), plus bare entry names such as `.snapshot` that are
//!    excluded wherever they appear.
//! 2. **Safety policy**: extra system directories, sensitive targets
//!    (`/etc/shadow`, `/root/`, …), and an optional read-access probe.
//!
//! An excluded path is invisible, exactly like a path outside the scan
//! root: the walker neither reports it nor counts it as an error.

use crate::config::ScanConfig;
use crate::platform;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Virtual and device filesystems skipped by default.
pub const DEFAULT_SKIP_PATHS: &[&str] = &["/proc", "/sys", "/dev", "/run"];

/// Entry names always skipped during traversal (filer snapshots).
pub const TRAVERSAL_SKIP_NAMES: &[&str] = &[".snapshot", ".zfs"];

/// Directories added by `safety.skip_system_dirs`.
pub const SYSTEM_DIRECTORIES: &[&str] = &["/boot", "/snap", "/var/lib/docker"];

/// Substrings that mark a path as sensitive under `safety.skip_dangerous_paths`.
pub const DANGEROUS_PATTERNS: &[&str] = &[
    "/etc/shadow",
    "/etc/passwd",
    "/etc/gshadow",
    "/root/",
    "/var/lib/",
    "/usr/lib/",
];

#[derive(Debug, Clone, Default)]
pub struct PathGate {
    prefixes: Vec<PathBuf>,
    names: Vec<OsString>,
    dangerous: Vec<String>,
    probe_access: bool,
}

impl PathGate {
    /// A gate that only applies the given skip entries. Entries starting
    /// with `/` are prefixes; anything else is matched as an entry name.
    pub fn new<I, S>(skip: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut gate = Self::default();
        for entry in skip {
            gate.add_skip(entry.as_ref());
        }
        gate
    }

    /// Build the gate described by `config`.
    pub fn from_config(config: &ScanConfig) -> Self {
        let mut gate = Self::new(&config.general.skip_paths);
        for name in TRAVERSAL_SKIP_NAMES {
            gate.add_skip(name);
        }
        if config.safety.skip_system_dirs {
            for dir in SYSTEM_DIRECTORIES {
                gate.add_skip(dir);
            }
        }
        gate.with_dangerous_paths(config.safety.skip_dangerous_paths)
            .with_access_probe(config.safety.probe_access)
    }

    pub fn with_dangerous_paths(mut self, enabled: bool) -> Self {
        self.dangerous = if enabled {
            DANGEROUS_PATTERNS.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };
        self
    }

    pub fn with_access_probe(mut self, enabled: bool) -> Self {
        self.probe_access = enabled;
        self
    }

    fn add_skip(&mut self, entry: &str) {
        let entry = entry.trim();
        if entry.is_empty() {
            return;
        }
        if entry.starts_with('/') {
            let path = PathBuf::from(entry);
            if !self.prefixes.contains(&path) {
                self.prefixes.push(path);
            }
        } else {
            let name = OsString::from(entry.trim_end_matches('/'));
            if !self.names.contains(&name) {
                self.names.push(name);
            }
        }
    }

    /// `true` if `path` must not be traversed or emitted.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.is_skipped(path) || self.violates_policy(path)
    }

    /// Check 1: the configured skip list.
    pub fn is_skipped(&self, path: &Path) -> bool {
        if self.prefixes.iter().any(|prefix| path.starts_with(prefix)) {
            return true;
        }
        !self.names.is_empty()
            && path.components().any(|c| match c {
                Component::Normal(name) => self.names.iter().any(|n| n == name),
                _ => false,
            })
    }

    /// Check 2: sensitive targets and, when enabled, read accessibility.
    pub fn violates_policy(&self, path: &Path) -> bool {
        if !self.dangerous.is_empty() {
            let text = path.to_string_lossy();
            if self.dangerous.iter().any(|p| text.contains(p.as_str())) {
                return true;
            }
        }
        self.probe_access && !platform::is_readable(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_gate() -> PathGate {
        PathGate::from_config(&ScanConfig::default())
    }

    #[test]
    fn virtual_filesystems_are_excluded_with_descendants() {
        let gate = default_gate();
        assert!(gate.is_excluded(Path::new("/proc")));
        assert!(gate.is_excluded(Path::new("/proc/1/status")));
        assert!(gate.is_excluded(Path::new("/sys/kernel")));
        assert!(gate.is_excluded(Path::new("/dev/null")));
        assert!(gate.is_excluded(Path::new("/run")));
    }

    #[test]
    fn prefix_match_respects_component_boundaries() {
        let gate = default_gate();
        assert!(!gate.is_excluded(Path::new("/process")));
        assert!(!gate.is_excluded(Path::new("/devices.txt")));
        assert!(!gate.is_excluded(Path::new("/home/user/proc")));
    }

    #[test]
    fn snapshot_names_are_excluded_anywhere() {
        let gate = default_gate();
        assert!(gate.is_excluded(Path::new("/export/home/.snapshot")));
        assert!(gate.is_excluded(Path::new("/tank/.zfs/snapshot/daily")));
        assert!(!gate.is_excluded(Path::new("/export/home/snapshot")));
    }

    #[test]
    fn system_directories_follow_safety_flag() {
        let gate = default_gate();
        assert!(gate.is_excluded(Path::new("/boot/vmlinuz")));
        assert!(gate.is_excluded(Path::new("/var/lib/docker/overlay2")));

        let mut cfg = ScanConfig::default();
        cfg.safety.skip_system_dirs = false;
        cfg.safety.skip_dangerous_paths = false;
        let relaxed = PathGate::from_config(&cfg);
        assert!(!relaxed.is_excluded(Path::new("/boot/vmlinuz")));
    }

    #[test]
    fn dangerous_targets_are_excluded() {
        let gate = default_gate();
        assert!(gate.violates_policy(Path::new("/etc/shadow")));
        assert!(gate.violates_policy(Path::new("/etc/passwd")));
        assert!(gate.violates_policy(Path::new("/root/.bash_history")));
        assert!(gate.violates_policy(Path::new("/usr/lib/x86_64-linux-gnu/libc.so.6")));
        assert!(!gate.violates_policy(Path::new("/etc/hosts")));
        assert!(!gate.violates_policy(Path::new("/var/log/syslog")));
    }

    #[test]
    fn dangerous_policy_can_be_disabled() {
        let gate = PathGate::new(DEFAULT_SKIP_PATHS).with_dangerous_paths(false);
        assert!(!gate.is_excluded(Path::new("/etc/shadow")));
        assert!(gate.is_excluded(Path::new("/proc/1/status")));
    }

    #[test]
    fn access_probe_hides_missing_paths() {
        let tmp = tempfile::TempDir::new().unwrap();
        let gate = PathGate::new(Vec::<String>::new()).with_access_probe(true);
        assert!(!gate.is_excluded(tmp.path()));
        assert!(gate.is_excluded(&tmp.path().join("vanished")));
    }

    #[test]
    fn custom_skip_entries_extend_the_list() {
        let gate = PathGate::new(["/mnt/backup", "node_modules", "  "]);
        assert!(gate.is_excluded(Path::new("/mnt/backup/2024")));
        assert!(gate.is_excluded(Path::new("/srv/app/node_modules")));
        assert!(!gate.is_excluded(Path::new("/mnt")));
    }

    #[test]
    fn empty_gate_excludes_nothing() {
        let gate = PathGate::default();
        assert!(!gate.is_excluded(Path::new("/proc")));
        assert!(!gate.is_excluded(Path::new("/etc/shadow")));
    }
}
