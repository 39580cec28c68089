pub mod firms;
pub mod projects;

pub use firms::{normalize_firms, NormalizedFirms};
pub use projects::{normalize_projects, NormalizedProjects};

use crate::dates::{self, ExportDate};
use crate::error::{ImporterError, Result};
use crate::sheets::SheetRow;

/// Cell text for a column, empty when the export omitted it.
fn cell<'a>(row: &'a SheetRow, column: &str) -> &'a str {
    row.get(column).map(String::as_str).unwrap_or("")
}

fn parse_id(row: &SheetRow, column: &str) -> Result<i64> {
    let raw = cell(row, column).trim();
    raw.parse().map_err(|_| ImporterError::InvalidId {
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Fails fast when a sheet's header lacks the key columns a normalizer
/// derives identifiers from. Every other column is optional; absent cells
/// map to empty strings.
fn ensure_key_columns(sheet: &str, rows: &[SheetRow], required: &[&str]) -> Result<()> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let missing: Vec<String> = required
        .iter()
        .filter(|column| !first.contains_key(**column))
        .map(|column| column.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImporterError::MissingColumns {
            sheet: sheet.to_string(),
            columns: missing,
        })
    }
}

/// Optional date cell: blank means absent, anything else must parse.
fn parse_date_cell(row: &SheetRow, column: &str) -> Result<Option<ExportDate>> {
    let raw = cell(row, column).trim();
    if raw.is_empty() {
        return Ok(None);
    }
    dates::parse(raw).map(Some)
}
