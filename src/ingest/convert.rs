use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

use super::detect::{detect_csv_format, CsvFormat, FieldKind};
use super::lenient::parse_decimal;
use super::{adapt_all, SourceKind};
use crate::summary::{decimal_to_json, summarize, UpstreamSummary};

#[derive(Debug, Clone)]
pub(crate) struct ConvertOptions {
    /// Goes into `metadata.date` verbatim; upstream uses both ISO dates and
    /// Thai short dates.
    pub(crate) date: String,
    pub(crate) source_label: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            source_label: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ConvertReport {
    pub(crate) format: &'static str,
    pub(crate) rows: usize,
    /// Amount cells that could not be read and were written as zero.
    pub(crate) coerced: usize,
    pub(crate) document: Value,
}

/// Read a CSV with a header row. Rows may be ragged.
pub(crate) fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|s| s.to_string())
        .collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        anyhow::bail!("CSV file is empty");
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result.context("Failed to read CSV record")?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }
    Ok((headers, rows))
}

pub(crate) fn build_snapshot(
    headers: &[String],
    rows: &[Vec<String>],
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    let format = detect_csv_format(headers)
        .ok_or_else(|| anyhow::anyhow!("Unrecognized CSV header: {}", headers.join(", ")))?;

    let mut coerced = 0usize;
    let budget_data: Vec<Value> = rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .enumerate()
        .map(|(i, row)| row_to_value(i, row, &format, &mut coerced))
        .collect();

    let (records, _) = adapt_all(&budget_data);
    let summary = summarize(&records);

    let mut metadata = Map::new();
    metadata.insert("date".into(), Value::from(options.date.clone()));
    if let Some(source) = &options.source_label {
        metadata.insert("source".into(), Value::from(source.clone()));
    }
    metadata.insert("total_projects".into(), Value::from(budget_data.len()));

    tracing::info!(
        "Converted {} {} rows ({} unreadable amounts set to zero)",
        budget_data.len(),
        format.name,
        coerced
    );

    Ok(ConvertReport {
        format: format.name,
        rows: budget_data.len(),
        coerced,
        document: json!({
            "metadata": metadata,
            "summary": UpstreamSummary::from_records(&records, &summary).to_value(),
            "budget_data": budget_data,
        }),
    })
}

pub(crate) fn convert_csv(input: &Path, options: &ConvertOptions) -> Result<ConvertReport> {
    let (headers, rows) = read_csv(input)?;
    build_snapshot(&headers, &rows, options)
}

fn row_to_value(index: usize, row: &[String], format: &CsvFormat, coerced: &mut usize) -> Value {
    let mut obj = Map::new();
    for mapping in &format.columns {
        let cell = row.get(mapping.column).map(|s| s.trim()).unwrap_or("");
        let value = match mapping.kind {
            FieldKind::Text if cell.is_empty() => Value::Null,
            FieldKind::Text => Value::from(cell),
            FieldKind::Amount => match parse_decimal(cell) {
                Ok(amount) => decimal_to_json(amount),
                Err(e) => {
                    tracing::debug!("Row {}: {} set to 0: {e}", index + 1, mapping.key);
                    *coerced += 1;
                    Value::from(0.0)
                }
            },
        };
        obj.insert(mapping.key.to_string(), value);
    }
    if format.source == SourceKind::PublicWorks {
        // Geocoding happens after conversion
        obj.insert("coordinates".into(), Value::Null);
    }
    Value::Object(obj)
}
