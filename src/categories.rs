use crate::constants::CATEGORY_TABLE_NAME;
use crate::error::{ImporterError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Static reference table mapping a sub-category code to its canonical
/// category id. Loaded once at startup and handed to the project
/// normalizer by reference.
///
/// The artifact is a database JSON export: an array of entries, one of
/// which is `{"type": "table", "name": "dim_project_category", "data":
/// [...]}`. The table is selected by name and validated rather than picked
/// by array position, so re-exports that reorder entries keep working.
#[derive(Debug, Clone)]
pub struct CategoryLookup {
    by_sub_category: HashMap<i64, String>,
}

impl CategoryLookup {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let lookup = Self::from_json(&content)?;
        info!(
            "Loaded {} category mappings from {}",
            lookup.len(),
            path.as_ref().display()
        );
        Ok(lookup)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let entries: Vec<Value> = serde_json::from_str(content)?;

        let table = entries
            .iter()
            .find(|entry| {
                entry.get("type").and_then(Value::as_str) == Some("table")
                    && entry.get("name").and_then(Value::as_str) == Some(CATEGORY_TABLE_NAME)
            })
            .ok_or_else(|| {
                ImporterError::CategoryTable(format!(
                    "artifact has no table entry named '{CATEGORY_TABLE_NAME}'"
                ))
            })?;

        let rows = table
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ImporterError::CategoryTable(format!(
                    "table '{CATEGORY_TABLE_NAME}' has no data array"
                ))
            })?;

        let mut by_sub_category = HashMap::with_capacity(rows.len());
        for row in rows {
            let (Some(category_id), Some(sub_category_id)) = (
                scalar_as_string(row.get("id")),
                scalar_as_i64(row.get("sub_category_id")),
            ) else {
                warn!("Skipping malformed category row: {row}");
                continue;
            };
            by_sub_category.insert(sub_category_id, category_id);
        }

        if by_sub_category.is_empty() {
            warn!("Category table '{CATEGORY_TABLE_NAME}' is empty; no project categories will resolve");
        }

        Ok(Self { by_sub_category })
    }

    /// Resolves a raw sub-category cell to its category id. Blank or
    /// non-numeric codes, and codes absent from the table, resolve to
    /// nothing; that is a skip, not an error.
    pub fn resolve(&self, code: &str) -> Option<&str> {
        let sub_category_id: i64 = code.trim().parse().ok()?;
        self.by_sub_category
            .get(&sub_category_id)
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_sub_category.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_sub_category.is_empty()
    }
}

// Database JSON exports quote numeric columns, so both "7" and 7 appear in
// the wild.
fn scalar_as_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_as_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}
