// src/inventory/loader.rs
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// A data row as read from the inventory, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line in the source file.
    pub line: u64,
    pub fields: Vec<String>,
}

/// Read a pipe-delimited inventory file. The header row is skipped.
pub async fn load_rows<P: AsRef<Path>>(path: P) -> Result<Vec<RawRow>> {
    let path = path.as_ref();
    let contents = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read inventory file {}", path.display()))?;

    parse_rows(contents.as_slice())
        .with_context(|| format!("Failed to parse inventory file {}", path.display()))
}

/// Parse inventory rows from any reader.
///
/// Rows keep whatever number of fields they have; the field count is
/// checked when the row is turned into a record so one bad row doesn't
/// fail the whole file. Empty rows are dropped.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .quote(b'"')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.is_empty() {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or_default();
        rows.push(RawRow {
            line,
            fields: record.iter().map(str::to_string).collect(),
        });
    }

    tracing::debug!("Loaded {} inventory rows", rows.len());
    Ok(rows)
}
