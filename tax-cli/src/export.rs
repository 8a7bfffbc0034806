//! File exports for a single result and for the calculation history.
//!
//! ## History CSV
//!
//! | Column         | Notes                                   |
//! |----------------|-----------------------------------------|
//! | `Date`         | UTC, `YYYY-MM-DD HH:MM:SS`              |
//! | `Gross Income` | exact decimal, no grouping              |
//! | `Extra Income` |                                         |
//! | `Deductions`   |                                         |
//! | `Final Income` |                                         |
//! | `Regime`       | `old` or `new`                          |
//! | `Currency`     | symbol recorded with the entry, e.g. `₹` |
//!
//! ## Documents
//!
//! Documents are plain text. The history document is a titled table split
//! into pages of a fixed number of rows, each closed by a `Page i of n`
//! footer and separated by a form feed.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;
use tax_core::{HistoryEntry, Regime, RegimeComparison, TaxResult};
use tracing::info;

use crate::cli::ExportFormat;
use crate::report::{DATE_FORMAT, comparison_table, history_table, render_breakdown};
use crate::utils::format_amount;

pub const HISTORY_TITLE: &str = "Tax Calculation History";
pub const RESULT_TITLE: &str = "Tax Calculation Result";

const PAGE_BREAK: &str = "\n\u{c}\n";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no history available to export")]
    EmptyHistory,

    #[error("page size must be at least 1")]
    InvalidPageSize,

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
struct HistoryCsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Gross Income")]
    gross_income: String,
    #[serde(rename = "Extra Income")]
    extra_income: String,
    #[serde(rename = "Deductions")]
    deductions: String,
    #[serde(rename = "Final Income")]
    final_income: String,
    #[serde(rename = "Regime")]
    regime: &'static str,
    #[serde(rename = "Currency")]
    currency: String,
}

fn plain(value: Decimal) -> String {
    value.normalize().to_string()
}

impl From<&HistoryEntry> for HistoryCsvRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            date: entry.recorded_at.format(DATE_FORMAT).to_string(),
            gross_income: plain(entry.gross_income),
            extra_income: plain(entry.extra_income),
            deductions: plain(entry.deductions),
            final_income: plain(entry.final_income),
            regime: entry.regime.as_str(),
            currency: entry.currency_symbol.clone(),
        }
    }
}

/// Writes the history as CSV, oldest entry first.
pub fn write_history_csv<W: Write>(
    entries: &[HistoryEntry],
    writer: W,
) -> Result<(), ExportError> {
    if entries.is_empty() {
        return Err(ExportError::EmptyHistory);
    }
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in entries {
        wtr.serialize(HistoryCsvRow::from(entry))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes one result as a single CSV record carrying every field.
pub fn write_result_csv<W: Write>(
    result: &TaxResult,
    writer: W,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.serialize(result)?;
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Splits the history into pages of `page_size` table rows.
pub fn render_history_document(
    entries: &[HistoryEntry],
    page_size: usize,
) -> Result<String, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::EmptyHistory);
    }
    if page_size == 0 {
        return Err(ExportError::InvalidPageSize);
    }

    let total = entries.len().div_ceil(page_size);
    let pages: Vec<String> = entries
        .chunks(page_size)
        .enumerate()
        .map(|(idx, chunk)| {
            format!(
                "{HISTORY_TITLE}\n\n{}\n\nPage {} of {}",
                history_table(chunk),
                idx + 1,
                total
            )
        })
        .collect();

    Ok(format!("{}\n", pages.join(PAGE_BREAK)))
}

/// The chosen regime's breakdown followed by the regime comparison.
pub fn render_result_document(
    comparison: &RegimeComparison,
    regime: Regime,
) -> String {
    let result = comparison.result_for(regime);
    format!(
        "{RESULT_TITLE}\n\nFinal In-Hand Income: {}\n\n{}\n\n{}\n",
        format_amount(&result.currency_symbol, result.final_income),
        render_breakdown(result),
        comparison_table(comparison)
    )
}

fn create_file(path: &Path) -> Result<File, ExportError> {
    File::create(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn write_file(
    path: &Path,
    contents: &str,
) -> Result<(), ExportError> {
    std::fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Writes the history to `path`. Nothing is created when the history is empty.
pub fn export_history(
    entries: &[HistoryEntry],
    format: ExportFormat,
    path: &Path,
    page_size: usize,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => {
            if entries.is_empty() {
                return Err(ExportError::EmptyHistory);
            }
            write_history_csv(entries, create_file(path)?)?
        }
        ExportFormat::Document => {
            write_file(path, &render_history_document(entries, page_size)?)?
        }
    }
    info!(path = %path.display(), entries = entries.len(), "exported history");
    Ok(())
}

/// Writes the result for `regime` to `path`.
pub fn export_result(
    comparison: &RegimeComparison,
    regime: Regime,
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_result_csv(comparison.result_for(regime), create_file(path)?)?,
        ExportFormat::Document => write_file(path, &render_result_document(comparison, regime))?,
    }
    info!(path = %path.display(), "exported result");
    Ok(())
}
