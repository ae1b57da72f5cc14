/// Machine-readable output of classified results (JSON, CSV).
///
/// Both writers stream to any `Write`; the binary points them at stdout.
use anyhow::{Context, Result};
use serde::Serialize;
use shuruhoja_core::model::ClassifiedResult;
use std::io::Write;

const CSV_HEADER: [&str; 11] = [
    "path",
    "size",
    "is_dir",
    "kind",
    "risk",
    "recommendation",
    "reason",
    "age_days",
    "modified",
    "uid",
    "gid",
];

/// One flat CSV line per result. Field order matches `CSV_HEADER`.
#[derive(Serialize)]
struct CsvRow<'a> {
    path: std::borrow::Cow<'a, str>,
    size: u64,
    is_dir: bool,
    kind: &'static str,
    risk: &'static str,
    recommendation: &'static str,
    reason: &'a str,
    age_days: i64,
    modified: String,
    uid: u32,
    gid: u32,
}

impl<'a> From<&'a ClassifiedResult> for CsvRow<'a> {
    fn from(r: &'a ClassifiedResult) -> Self {
        Self {
            path: r.record.path.to_string_lossy(),
            size: r.record.size,
            is_dir: r.record.is_dir,
            kind: r.kind.label(),
            risk: r.risk.label(),
            recommendation: r.recommendation.label(),
            reason: r.reason.as_str(),
            age_days: r.age_days,
            modified: r.record.modified.to_rfc3339(),
            uid: r.record.uid,
            gid: r.record.gid,
        }
    }
}

/// Pretty-printed JSON array, in result order.
pub fn write_json<W: Write>(out: &mut W, results: &[ClassifiedResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results).context("Failed to serialise results as JSON")?;
    writeln!(out)?;
    Ok(())
}

/// Header row plus one row per result, in result order.
pub fn write_csv<W: Write>(out: &mut W, results: &[ClassifiedResult]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer
        .write_record(CSV_HEADER)
        .context("Failed to write CSV header")?;
    for r in results {
        writer
            .serialize(CsvRow::from(r))
            .with_context(|| format!("Failed to write CSV row for {}", r.record.path.display()))?;
    }
    writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}
