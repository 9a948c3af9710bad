//! Export — serialises records and statistics for download or piping.
//!
//! CSV is the primary format: a fixed header row followed by one row per
//! record or context. JSON lines are offered for scripting.

use serde::Serialize;

use crate::types::{ContextStats, NormalizedRecord};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv serialisation failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("json serialisation failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("exported text is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("could not flush export buffer: {0}")]
    Flush(String),
}

/// Output format for [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Jsonl,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "jsonl" | "ndjson" => Ok(ExportFormat::Jsonl),
            other => Err(format!("unknown export format: {other} (expected csv or jsonl)")),
        }
    }
}

/// A row type with a fixed column layout.
pub trait CsvRow {
    const HEADER: &'static [&'static str];

    /// Field values in [`Self::HEADER`] order.
    fn fields(&self) -> Vec<String>;
}

impl CsvRow for NormalizedRecord {
    const HEADER: &'static [&'static str] =
        &["@timestamp", "url", "Application Context", "Time Taken (ms)"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.url.clone(),
            self.context.clone(),
            self.latency_ms.map(|ms| ms.to_string()).unwrap_or_default(),
        ]
    }
}

impl CsvRow for ContextStats {
    const HEADER: &'static [&'static str] = &[
        "Application Context",
        "Count",
        "Min Time (ms)",
        "Max Time (ms)",
        "Average Time (ms)",
        "Median Time (ms)",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.context.clone(),
            self.count.to_string(),
            self.min.to_string(),
            self.max.to_string(),
            self.mean.to_string(),
            self.median.to_string(),
        ]
    }
}

/// Serialise rows as CSV. The header is always written, so an empty input
/// produces a single header line.
pub fn export_csv<'a, R>(rows: impl IntoIterator<Item = &'a R>) -> Result<String, ExportError>
where
    R: CsvRow + 'a,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(R::HEADER)?;
    for row in rows {
        writer.write_record(row.fields())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.error().to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Serialise rows as JSON lines, one object per row.
pub fn export_jsonl<'a, R>(rows: impl IntoIterator<Item = &'a R>) -> Result<String, ExportError>
where
    R: Serialize + 'a,
{
    let mut out = String::new();
    for row in rows {
        out.push_str(&serde_json::to_string(row)?);
        out.push('\n');
    }
    Ok(out)
}

/// Serialise rows in the requested format.
pub fn export<'a, R>(
    rows: impl IntoIterator<Item = &'a R>,
    format: ExportFormat,
) -> Result<String, ExportError>
where
    R: CsvRow + Serialize + 'a,
{
    match format {
        ExportFormat::Csv => export_csv(rows),
        ExportFormat::Jsonl => export_jsonl(rows),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
