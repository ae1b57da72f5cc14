/// Human-readable report: banner, summary, findings table, recommendations.
///
/// Every function writes to a caller-supplied `Write` so the report can be
/// captured in tests. Colour comes only from the [`Theme`] argument.
use crate::theme::{Theme, Tone};
use shuruhoja_core::analysis::Analysis;
use shuruhoja_core::config::OutputConfig;
use shuruhoja_core::model::size::{format_count, format_gigabytes, format_size};
use shuruhoja_core::model::{ClassifiedResult, Recommendation, RiskLevel, ScanSummary};
use std::io::{self, Write};

/// Bullets shown per severity in the recommendations section.
pub const MAX_RECOMMENDATIONS: usize = 10;

const RULE: &str = "══════════════════════════════════════════════════════════";

const SIZE_WIDTH: usize = 10;
const KIND_WIDTH: usize = 9;
const RISK_WIDTH: usize = 8;
const REC_WIDTH: usize = 14;

pub fn write_banner<W: Write>(out: &mut W, theme: &Theme) -> io::Result<()> {
    writeln!(out, "{}", theme.heading("┌─────────────────────────────────────────────┐"))?;
    writeln!(out, "{}", theme.heading("│       SHURU HOJA - Filesystem Analyser      │"))?;
    writeln!(out, "{}", theme.heading("└─────────────────────────────────────────────┘"))?;
    writeln!(
        out,
        "{}",
        theme.paint("Read-only mode: no files will be modified", Tone::Caution)
    )?;
    writeln!(out)
}

fn write_section_title<W: Write>(out: &mut W, theme: &Theme, title: &str, tone: Tone) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", theme.paint(RULE, tone))?;
    writeln!(out, "{title:^width$}", width = RULE.chars().count())?;
    writeln!(out, "{}", theme.paint(RULE, tone))
}

pub fn write_summary<W: Write>(
    out: &mut W,
    theme: &Theme,
    summary: &ScanSummary,
    diagnostics: u64,
) -> io::Result<()> {
    write_section_title(out, theme, "SCAN SUMMARY", Tone::Heading)?;
    let rows = [
        ("Total Scanned:", format_gigabytes(summary.total_bytes)),
        ("Total Files:", format_count(summary.total_files)),
        ("Total Directories:", format_count(summary.total_dirs)),
        ("Potential Cleanup:", format_gigabytes(summary.potential_cleanup)),
        ("Critical Risk Items:", format_count(summary.critical_count)),
        ("Caution Risk Items:", format_count(summary.caution_count)),
        ("Unreadable Paths:", format_count(diagnostics)),
        (
            "Scan Duration:",
            format!("{:.2} seconds", summary.duration.as_secs_f64()),
        ),
    ];
    for (label, value) in rows {
        writeln!(out, "  {label:<22}{value}")?;
    }
    Ok(())
}

/// Results worth acting on: neither `safe` nor `keep`.
pub fn findings(results: &[ClassifiedResult], limit: usize) -> Vec<&ClassifiedResult> {
    results
        .iter()
        .filter(|r| r.recommendation != Recommendation::Keep && r.risk != RiskLevel::Safe)
        .take(limit)
        .collect()
}

pub fn write_findings<W: Write>(
    out: &mut W,
    theme: &Theme,
    results: &[ClassifiedResult],
    max_results: usize,
    path_width: usize,
) -> io::Result<()> {
    let rows = findings(results, max_results);
    writeln!(out)?;
    if rows.is_empty() {
        return writeln!(
            out,
            "{}",
            theme.paint("✓ No cleanup recommendations found", Tone::Safe)
        );
    }

    write_section_title(out, theme, "TOP CLEANUP RECOMMENDATIONS", Tone::Heading)?;
    writeln!(
        out,
        "{:<SIZE_WIDTH$} {:<KIND_WIDTH$} {:<RISK_WIDTH$} {:<REC_WIDTH$} PATH",
        "SIZE", "TYPE", "RISK", "RECOMMENDATION"
    )?;
    for r in rows {
        // Pad before painting; escape codes would throw the widths off.
        let risk = format!("{:<RISK_WIDTH$}", r.risk.label());
        let rec = format!("{:<REC_WIDTH$}", r.recommendation.label());
        writeln!(
            out,
            "{:<SIZE_WIDTH$} {:<KIND_WIDTH$} {} {} {}",
            format_size(r.size()),
            r.kind.label(),
            theme.paint(&risk, Theme::risk_tone(r.risk)),
            theme.paint(&rec, Theme::recommendation_tone(r.recommendation)),
            truncate_path(&r.record.path.to_string_lossy(), path_width),
        )?;
    }
    Ok(())
}

pub fn write_recommendations<W: Write>(
    out: &mut W,
    theme: &Theme,
    results: &[ClassifiedResult],
    path_width: usize,
) -> io::Result<()> {
    let sections = [
        (RiskLevel::Critical, "CRITICAL RECOMMENDATIONS", Tone::Critical),
        (RiskLevel::Caution, "CAUTION RECOMMENDATIONS", Tone::Caution),
    ];
    for (risk, title, tone) in sections {
        let mut picked = results
            .iter()
            .filter(|r| r.risk == risk && r.recommendation == risk.recommendation())
            .take(MAX_RECOMMENDATIONS)
            .peekable();
        if picked.peek().is_none() {
            continue;
        }
        write_section_title(out, theme, title, tone)?;
        for r in picked {
            writeln!(
                out,
                "{} - {} ({})",
                theme.paint(&format!("• {}", format_size(r.size())), tone),
                truncate_path(&r.record.path.to_string_lossy(), path_width),
                r.reason,
            )?;
        }
    }
    Ok(())
}

/// The full table-format report for one analysis.
pub fn write_report<W: Write>(
    out: &mut W,
    theme: &Theme,
    analysis: &Analysis,
    output: &OutputConfig,
) -> io::Result<()> {
    if analysis.is_cancelled() {
        writeln!(
            out,
            "{}",
            theme.paint("⚠ Scan interrupted; showing partial results", Tone::Caution)
        )?;
    }
    write_summary(out, theme, &analysis.summary(), analysis.diagnostic_count)?;
    write_findings(
        out,
        theme,
        &analysis.results,
        output.max_results,
        output.truncate_path_length,
    )?;
    write_recommendations(out, theme, &analysis.results, output.truncate_path_length)?;
    writeln!(out)
}

/// Shorten `path` to at most `max` characters by replacing its middle
/// with `...`, keeping the head and tail.
pub fn truncate_path(path: &str, max: usize) -> String {
    let len = path.chars().count();
    if len <= max {
        return path.to_string();
    }
    if max <= 3 {
        return path.chars().take(max).collect();
    }
    let keep = (max - 3) / 2;
    let head: String = path.chars().take(keep).collect();
    let tail: String = path.chars().skip(len - keep).collect();
    format!("{head}...{tail}")
}
