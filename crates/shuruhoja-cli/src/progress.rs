/// Scan progress spinner.
///
/// Driven from the pipeline's per-result callback, so it only ever runs on
/// the consumer thread. Draws to stderr and stays hidden when disabled.
use indicatif::{ProgressBar, ProgressStyle};
use shuruhoja_core::model::size::{format_count, format_size};
use shuruhoja_core::model::{ClassifiedResult, RiskLevel};
use std::time::Duration;

/// Results between message refreshes.
const REFRESH_EVERY: u64 = 512;

pub struct ScanProgress {
    bar: ProgressBar,
    entries: u64,
    bytes: u64,
    flagged: u64,
}

impl ScanProgress {
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            let bar = ProgressBar::new_spinner();
            let style = ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {msg}")
                .map(|s| s.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "))
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            bar.set_style(style);
            bar.set_message("Scanning filesystem...");
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        Self {
            bar,
            entries: 0,
            bytes: 0,
            flagged: 0,
        }
    }

    pub fn observe(&mut self, result: &ClassifiedResult) {
        self.entries += 1;
        self.bytes += result.size();
        if result.risk != RiskLevel::Safe {
            self.flagged += 1;
        }
        if self.entries % REFRESH_EVERY == 0 {
            self.bar.set_message(self.message());
        }
    }

    pub fn entries(&self) -> u64 {
        self.entries
    }

    fn message(&self) -> String {
        format!(
            "Entries: {} | Size: {} | Flagged: {}",
            format_count(self.entries),
            format_size(self.bytes),
            format_count(self.flagged),
        )
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
