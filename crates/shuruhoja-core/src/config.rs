//! Scan configuration: an immutable snapshot taken at scan start.
//!
//! The on-disk format is INI, read with the `config` crate:
//!
//! ```text
//! # comment
//! [general]
//! max_workers = 64
//! skip_paths = /proc,/sys,/dev,/run,/mnt/backup
//!
//! [detection]
//! log_file_age_days = 14
//! ```
//!
//! Text that is not valid INI is a [`ConfigError`]. A malformed value in
//! valid INI never aborts loading: it is logged and the default is kept.
//! Unknown sections and keys are ignored.

use crate::error::ConfigError;
use ::config::{Config, File, FileFormat};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// System-wide config file consulted when no explicit path is given.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/shuruhoja.conf";

/// Per-user config file, relative to the home directory.
pub const USER_CONFIG_PATH: &str = ".config/shuruhoja.conf";

const MIB: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanConfig {
    pub general: GeneralConfig,
    pub detection: DetectionConfig,
    pub output: OutputConfig,
    pub safety: SafetyConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralConfig {
    /// Ceiling on concurrent directory listings.
    pub max_workers: usize,
    /// Absolute prefixes or bare entry names that are never traversed.
    pub skip_paths: Vec<String>,
    /// Deepest directory level to expand; 0 means unlimited.
    pub max_depth: usize,
    /// Capacity of the bounded record stream.
    pub record_buffer: usize,
    /// Capacity of the bounded error stream.
    pub error_buffer: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_workers: 100,
            skip_paths: crate::gate::DEFAULT_SKIP_PATHS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_depth: 0,
            record_buffer: 10_000,
            error_buffer: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionConfig {
    pub log_file_age_days: i64,
    /// Old logs strictly larger than this are `critical/delete`.
    pub log_critical_size: u64,
    pub cache_min_size: u64,
    pub temp_file_age_days: i64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            log_file_age_days: 30,
            log_critical_size: 100 * MIB,
            cache_min_size: 100 * MIB,
            temp_file_age_days: 7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown output format '{other}' (expected table, json or csv)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: bool,
    pub max_results: usize,
    pub truncate_path_length: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            color: true,
            max_results: 50,
            truncate_path_length: 80,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyConfig {
    /// Also skip `/boot`, `/snap` and `/var/lib/docker`.
    pub skip_system_dirs: bool,
    /// Skip sensitive targets such as `/etc/shadow` and `/root/`.
    pub skip_dangerous_paths: bool,
    /// Silently skip paths that fail a read-access probe.
    pub probe_access: bool,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            skip_system_dirs: true,
            skip_dangerous_paths: true,
            probe_access: false,
        }
    }
}

impl ScanConfig {
    /// Parse INI text on top of the defaults.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let source = Config::builder()
            .add_source(File::from_str(text, FileFormat::Ini))
            .build()
            .map_err(ConfigError::Parse)?;
        Ok(Self::from_source(&source))
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini).required(true))
            .build()
            .map_err(|source| ConfigError::Load {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(Self::from_source(&source))
    }

    /// Locate and load configuration.
    ///
    /// An explicit path must be readable. Otherwise the system file, then
    /// the per-user file are tried, falling back to defaults. Returns the
    /// path actually used, if any.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let mut candidates = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(USER_CONFIG_PATH));
        }

        for candidate in candidates.into_iter().filter(|c| c.is_file()) {
            match Self::load(&candidate) {
                Ok(cfg) => return Ok((cfg, Some(candidate))),
                Err(e) => warn!(error = %e, "Skipping unreadable config file"),
            }
        }

        info!("Using default configuration");
        Ok((Self::default(), None))
    }

    /// Typed view over a loaded source. Each key is converted on its own;
    /// a bad value is logged and the default kept.
    fn from_source(source: &Config) -> Self {
        let mut cfg = Self::default();
        let values = Values(source);

        let general = &mut cfg.general;
        if let Some(v) = values.positive("general.max_workers") {
            general.max_workers = v;
        }
        if let Some(v) = values.list("general.skip_paths") {
            general.skip_paths = v;
        }
        if let Some(v) = values.number("general.max_depth") {
            general.max_depth = v;
        }
        if let Some(v) = values.positive("general.record_buffer") {
            general.record_buffer = v;
        }
        if let Some(v) = values.positive("general.error_buffer") {
            general.error_buffer = v;
        }

        let detection = &mut cfg.detection;
        if let Some(v) = values.number("detection.log_file_age_days") {
            detection.log_file_age_days = v;
        }
        if let Some(v) = values.number("detection.log_critical_size") {
            detection.log_critical_size = v;
        }
        if let Some(v) = values.number("detection.cache_min_size") {
            detection.cache_min_size = v;
        }
        if let Some(v) = values.number("detection.temp_file_age_days") {
            detection.temp_file_age_days = v;
        }

        let output = &mut cfg.output;
        if let Some(raw) = values.string("output.format") {
            match raw.parse() {
                Ok(format) => output.format = format,
                Err(e) => warn!(key = "output.format", value = %raw, error = %e, "Invalid config value, keeping default"),
            }
        }
        if let Some(v) = values.boolean("output.color") {
            output.color = v;
        }
        if let Some(v) = values.number("output.max_results") {
            output.max_results = v;
        }
        if let Some(v) = values.positive("output.truncate_path_length") {
            output.truncate_path_length = v;
        }

        let safety = &mut cfg.safety;
        if let Some(v) = values.boolean("safety.skip_system_dirs") {
            safety.skip_system_dirs = v;
        }
        if let Some(v) = values.boolean("safety.skip_dangerous_paths") {
            safety.skip_dangerous_paths = v;
        }
        if let Some(v) = values.boolean("safety.probe_access") {
            safety.probe_access = v;
        }

        cfg
    }
}

struct Values<'a>(&'a Config);

impl Values<'_> {
    /// `None` when the key is absent or its value is unusable.
    fn lookup<T>(&self, key: &str, value: Result<T, ::config::ConfigError>) -> Option<T> {
        match value {
            Ok(v) => Some(v),
            Err(::config::ConfigError::NotFound(_)) => None,
            Err(e) => {
                warn!(key, error = %e, "Invalid config value, keeping default");
                None
            }
        }
    }

    fn string(&self, key: &str) -> Option<String> {
        self.lookup(key, self.0.get_string(key))
    }

    fn boolean(&self, key: &str) -> Option<bool> {
        self.lookup(key, self.0.get_bool(key))
    }

    fn number<T: TryFrom<i64>>(&self, key: &str) -> Option<T> {
        let raw = self.lookup(key, self.0.get_int(key))?;
        match T::try_from(raw) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(key, value = raw, "Config value out of range, keeping default");
                None
            }
        }
    }

    /// Like [`number`](Self::number) but also rejects zero.
    fn positive(&self, key: &str) -> Option<usize> {
        match self.number::<usize>(key) {
            Some(0) => {
                warn!(key, "Config value must be positive, keeping default");
                None
            }
            other => other,
        }
    }

    /// Comma-separated list with blanks dropped.
    fn list(&self, key: &str) -> Option<Vec<String>> {
        let raw = self.string(key)?;
        Some(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}
