use crate::categories::CategoryLookup;
use crate::constants::{
    COMPANY_TABLE, CONTACT_TABLE, FIRM_DETAILS_SHEET, PROJECTS_SHEET, PROJECT_TABLE,
    REL_COMPANY_CONTACT_ROLE_TABLE, REL_PROJECT_CATEGORY_TABLE,
    REL_PROJECT_CONTACT_COMPANY_TABLE, TABLES,
};
use crate::error::Result;
use crate::normalize::{normalize_firms, normalize_projects};
use crate::sheets::Workbook;
use crate::store::Store;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Outcome of one full reload: per-file failures plus rows actually
/// inserted per table across the run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_processed: usize,
    pub files_failed: usize,
    pub failures: Vec<FileFailure>,
    pub rows_inserted: BTreeMap<&'static str, usize>,
}

#[derive(Debug)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

/// Sequences a full reload: reset every target table, then parse,
/// normalize, and bulk-load each export file in turn. Strictly sequential;
/// callers must not run two imports against the same database at once.
pub struct Importer {
    store: Store,
    categories: CategoryLookup,
}

impl Importer {
    pub fn new(store: Store, categories: CategoryLookup) -> Self {
        Self { store, categories }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Performs a full reload from every file in `export_dir`.
    ///
    /// A truncate failure aborts the run: inserting over a half-reset
    /// store would let stale rows survive behind insert-or-ignore. A
    /// failing file is logged, counted, and skipped; the rest of the batch
    /// still loads.
    pub fn run<P: AsRef<Path>>(&mut self, export_dir: P) -> Result<RunSummary> {
        for table in TABLES {
            self.store.truncate(table)?;
        }

        let files = list_export_files(export_dir.as_ref())?;
        if files.is_empty() {
            warn!("No export files found in {}", export_dir.as_ref().display());
        }

        let mut summary = RunSummary::default();
        for table in TABLES {
            summary.rows_inserted.insert(table, 0);
        }

        for file in &files {
            info!("Importing {}", file.display());
            match self.import_file(file) {
                Ok(counts) => {
                    summary.files_processed += 1;
                    for (table, count) in counts {
                        *summary.rows_inserted.entry(table).or_default() += count;
                    }
                }
                Err(e) => {
                    error!("Failed to import {}: {e}", file.display());
                    summary.files_failed += 1;
                    summary.failures.push(FileFailure {
                        file: file.display().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Import run finished: {} files processed, {} failed",
            summary.files_processed, summary.files_failed
        );
        Ok(summary)
    }

    /// Loads one export file. Entities are inserted before the relations
    /// that reference them.
    fn import_file(&mut self, path: &Path) -> Result<BTreeMap<&'static str, usize>> {
        let workbook = Workbook::load(path)?;

        let projects = normalize_projects(workbook.sheet(PROJECTS_SHEET), &self.categories)?;
        let firms = normalize_firms(workbook.sheet(FIRM_DETAILS_SHEET))?;

        let mut counts = BTreeMap::new();
        counts.insert(PROJECT_TABLE, self.store.insert_projects(&projects.projects)?);
        counts.insert(COMPANY_TABLE, self.store.insert_companies(&firms.companies)?);
        counts.insert(CONTACT_TABLE, self.store.insert_contacts(&firms.contacts)?);
        counts.insert(
            REL_PROJECT_CATEGORY_TABLE,
            self.store.insert_project_categories(&projects.categories)?,
        );
        counts.insert(
            REL_COMPANY_CONTACT_ROLE_TABLE,
            self.store
                .insert_company_contact_roles(&firms.company_contact_roles)?,
        );
        counts.insert(
            REL_PROJECT_CONTACT_COMPANY_TABLE,
            self.store
                .insert_project_contact_companies(&firms.project_contact_companies)?,
        );
        Ok(counts)
    }
}

/// Export files in deterministic order. Directory-listing order is
/// filesystem-dependent, so entries are sorted by name; correctness does
/// not depend on order, but logs and summaries stay reproducible.
fn list_export_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn importer() -> Importer {
        let categories = CategoryLookup::from_json(
            r#"[{"type": "table", "name": "dim_project_category", "data": []}]"#,
        )
        .unwrap();
        Importer::new(Store::open_in_memory().unwrap(), categories)
    }

    #[test]
    fn empty_directory_yields_empty_summary() {
        let dir = tempfile::tempdir().unwrap();
        let summary = importer().run(dir.path()).unwrap();
        assert_eq!(summary.files_processed, 0);
        assert_eq!(summary.files_failed, 0);
        assert!(summary.rows_inserted.values().all(|&n| n == 0));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("not-here");
        assert!(importer().run(&gone).is_err());
    }

    #[test]
    fn files_are_visited_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["2.xls", "10.xls", "1.xls"] {
            fs::write(dir.path().join(name), "not xml").unwrap();
        }
        let summary = importer().run(dir.path()).unwrap();
        let visited: Vec<&str> = summary
            .failures
            .iter()
            .map(|f| f.file.rsplit('/').next().unwrap())
            .collect();
        // lexicographic, not numeric
        assert_eq!(visited, vec!["1.xls", "10.xls", "2.xls"]);
    }

    #[test]
    fn malformed_file_fails_alone() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.xls"), "<Workbook><Worksheet>").unwrap();
        let summary = importer().run(dir.path()).unwrap();
        assert_eq!(summary.files_failed, 1);
        assert_eq!(summary.files_processed, 0);
        assert!(summary.failures[0].error.contains("not well-formed"));
    }
}
