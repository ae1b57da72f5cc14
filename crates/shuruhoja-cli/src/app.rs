/// Top-level command flow: configuration, signal wiring, scan, report.
use crate::args::Cli;
use crate::export;
use crate::progress::ScanProgress;
use crate::render;
use crate::theme::Theme;
use anyhow::{bail, Context, Result};
use shuruhoja_core::config::OutputFormat;
use shuruhoja_core::{Analyzer, CancelToken, ScanConfig};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// How a run ended, for the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Stopped by SIGINT/SIGTERM; partial results were reported.
    Interrupted,
}

impl Outcome {
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Completed => 0,
            Self::Interrupted => 130,
        }
    }
}

/// Run the CLI against the real process environment: config files,
/// signal handlers, stdout.
pub fn run(cli: &Cli) -> Result<Outcome> {
    let (mut config, source) =
        ScanConfig::discover(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = &source {
        debug!(path = %path.display(), "Configuration source");
    }
    cli.apply(&mut config);
    let root = cli.scan_root()?;

    let cancel = CancelToken::new();
    install_interrupt_handler(&cancel);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    scan_and_report(&config, &root, &cancel, cli.show_progress(), &mut out)
}

/// Scan `root` with `config` and write the report in the configured format.
pub fn scan_and_report<W: Write>(
    config: &ScanConfig,
    root: &Path,
    cancel: &CancelToken,
    show_progress: bool,
    out: &mut W,
) -> Result<Outcome> {
    if !root.is_dir() {
        bail!("Scan root {} is not a readable directory", root.display());
    }

    let format = config.output.format;
    let theme = Theme {
        color: config.output.color,
    };
    if format == OutputFormat::Table {
        render::write_banner(out, &theme)?;
    }

    info!(
        root = %root.display(),
        workers = config.general.max_workers,
        format = %format,
        "Scanning"
    );

    let analyzer = Analyzer::from_config(config);
    let mut progress = ScanProgress::new(show_progress);
    let analysis = analyzer
        .analyze_with(cancel, root, |result| progress.observe(result))
        .context("Failed to start the scan")?;
    progress.finish();

    let outcome = if analysis.is_cancelled() {
        warn!(
            results = analysis.results.len(),
            "Scan interrupted; reporting partial results"
        );
        Outcome::Interrupted
    } else {
        Outcome::Completed
    };

    match format {
        OutputFormat::Table => render::write_report(out, &theme, &analysis, &config.output)?,
        OutputFormat::Json => export::write_json(out, &analysis.results)?,
        OutputFormat::Csv => export::write_csv(out, &analysis.results)?,
    }
    out.flush()?;

    Ok(outcome)
}

/// Route SIGINT/SIGTERM to `cancel`. A handler can only be installed once
/// per process; later attempts are logged and ignored.
fn install_interrupt_handler(cancel: &CancelToken) {
    let token = cancel.clone();
    let installed = ctrlc::set_handler(move || {
        if token.is_cancelled() {
            return;
        }
        eprintln!("\nInterrupt received, finishing up...");
        token.cancel();
    });
    if let Err(e) = installed {
        warn!(error = %e, "Could not install interrupt handler");
    }
}
