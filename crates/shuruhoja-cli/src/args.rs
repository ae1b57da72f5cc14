//! Command-line arguments.
//!
//! Flags override values loaded from the configuration file; anything left
//! unset keeps the file's (or the built-in) value.

use anyhow::{Context, Result};
use clap::Parser;
use shuruhoja_core::config::{OutputFormat, ScanConfig};
use shuruhoja_core::scanner::clamp_workers;
use std::path::{Path, PathBuf};

/// Read-only filesystem analyser that ranks cleanup candidates by risk
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "shuruhoja",
    version,
    about = "Read-only filesystem analyser that ranks cleanup candidates by risk",
    long_about = "Walks a directory tree in parallel, classifies every entry with a chain of\n\
                  detectors (old logs, large caches, stale temp files) and prints the\n\
                  entries worth cleaning up, largest first.\n\n\
                  Nothing is ever modified or deleted.",
    after_help = "EXAMPLES:\n    \
        shuruhoja /var\n    \
        shuruhoja / -w 32 --skip /mnt --skip node_modules\n    \
        shuruhoja /srv --format json > findings.json\n    \
        shuruhoja ~ --log-age-days 14 --max-results 20"
)]
pub struct Cli {
    /// Directory to scan
    #[arg(value_name = "ROOT", default_value = "/")]
    pub root: PathBuf,

    /// Configuration file (default: /etc/shuruhoja.conf, then ~/.config/shuruhoja.conf)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum concurrent directory listings
    #[arg(short, long, value_name = "NUM", value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: Option<u64>,

    /// Deepest directory level to expand (0 = unlimited)
    #[arg(long, value_name = "NUM")]
    pub max_depth: Option<usize>,

    /// Output format
    #[arg(long, value_name = "FORMAT", value_parser = parse_format)]
    pub format: Option<OutputFormat>,

    /// Rows shown in the findings table
    #[arg(long, value_name = "NUM")]
    pub max_results: Option<usize>,

    /// Age in days after which a log file is flagged
    #[arg(long, value_name = "DAYS")]
    pub log_age_days: Option<u32>,

    /// Additional path prefix or entry name to skip (repeatable)
    #[arg(long = "skip", value_name = "PATH", action = clap::ArgAction::Append)]
    pub skip: Vec<String>,

    /// Disable coloured output
    #[arg(long)]
    pub no_color: bool,

    /// Disable the progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    s.parse()
}

impl Cli {
    /// Layer the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut ScanConfig) {
        if let Some(workers) = self.workers {
            config.general.max_workers = clamp_workers(usize::try_from(workers).unwrap_or(usize::MAX));
        }
        if let Some(depth) = self.max_depth {
            config.general.max_depth = depth;
        }
        for entry in &self.skip {
            if !config.general.skip_paths.contains(entry) {
                config.general.skip_paths.push(entry.clone());
            }
        }
        if let Some(days) = self.log_age_days {
            config.detection.log_file_age_days = i64::from(days);
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(max) = self.max_results {
            config.output.max_results = max;
        }
        if self.no_color {
            config.output.color = false;
        }
    }

    /// The scan root as an absolute path.
    pub fn scan_root(&self) -> Result<PathBuf> {
        absolutize(&self.root)
    }

    pub fn show_progress(&self) -> bool {
        !self.no_progress
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Cannot resolve the current directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("shuruhoja").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_scan_the_filesystem_root() {
        let cli = parse(&[]);
        assert_eq!(cli.root, PathBuf::from("/"));
        assert!(cli.show_progress());

        let mut cfg = ScanConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg, ScanConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&[
            "/var",
            "-w",
            "8",
            "--max-depth",
            "3",
            "--format",
            "json",
            "--max-results",
            "5",
            "--log-age-days",
            "14",
            "--skip",
            "/mnt",
            "--skip",
            "node_modules",
            "--no-color",
        ]);
        let mut cfg = ScanConfig::default();
        cli.apply(&mut cfg);

        assert_eq!(cfg.general.max_workers, 8);
        assert_eq!(cfg.general.max_depth, 3);
        assert_eq!(cfg.output.format, OutputFormat::Json);
        assert_eq!(cfg.output.max_results, 5);
        assert_eq!(cfg.detection.log_file_age_days, 14);
        assert!(cfg.general.skip_paths.iter().any(|p| p == "/mnt"));
        assert!(cfg.general.skip_paths.iter().any(|p| p == "node_modules"));
        assert!(!cfg.output.color);
    }

    #[test]
    fn zero_workers_is_rejected() {
        let err = Cli::try_parse_from(["shuruhoja", "-w", "0"]);
        assert!(err.is_err());
    }

    #[test]
    fn huge_worker_count_is_clamped() {
        let cli = parse(&["-w", "18446744073709551615"]);
        let mut cfg = ScanConfig::default();
        cli.apply(&mut cfg);
        assert_eq!(cfg.general.max_workers, shuruhoja_core::scanner::MAX_WORKERS_LIMIT);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["shuruhoja", "--format", "xml"]).is_err());
    }

    #[test]
    fn relative_root_is_made_absolute() {
        let cli = parse(&["some/dir"]);
        let root = cli.scan_root().unwrap();
        assert!(root.is_absolute());
        assert!(root.ends_with("some/dir"));
    }
}
