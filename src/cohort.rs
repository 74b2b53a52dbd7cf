use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CurateError, Result};
use crate::normalize;
use crate::table::Table;

/// The trusted subject-key set, read from the curated cohort (grades)
/// table. Every other table's filter stage borrows this read-only.
#[derive(Debug)]
pub struct CohortKeys {
    keys: HashSet<String>,
    source: PathBuf,
}

impl CohortKeys {
    /// Load the persisted cohort table. The `uid` column is required; its
    /// values are trimmed before membership tests.
    pub fn load(path: &Path) -> Result<Self> {
        let mut table = Table::read_csv(path)?;
        normalize::trim_headers(&mut table);
        let idx = table
            .column_index("uid")
            .ok_or_else(|| CurateError::schema("grades", "uid"))?;

        let keys: HashSet<String> = table
            .rows
            .iter()
            .map(|row| row[idx].trim().to_string())
            .collect();
        debug!(count = keys.len(), source = %path.display(), "loaded cohort key set");

        Ok(CohortKeys {
            keys,
            source: path.to_path_buf(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The persisted cohort table this set was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Row and distinct-key counts taken on both sides of the referential
/// filter, for provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub rows_before: usize,
    pub rows_after: usize,
    pub unique_keys_before: usize,
    pub unique_keys_after: usize,
}

/// Retain exactly the rows whose subject key is a member of the cohort.
/// Inner-join semantics: unmatched table rows are dropped, unmatched cohort
/// members contribute nothing.
pub fn filter_to_cohort(table: &mut Table, cohort: &CohortKeys) -> FilterStats {
    let rows_before = table.len();
    let unique_keys_before = table.unique_count("uid");

    if let Some(idx) = table.column_index("uid") {
        table.rows.retain(|row| cohort.contains(&row[idx]));
    }

    FilterStats {
        rows_before,
        rows_after: table.len(),
        unique_keys_before,
        unique_keys_after: table.unique_count("uid"),
    }
}

/// Relational inner join on the subject key against the deduplicated cohort
/// key column. Used by tables whose curation is defined as a row-level
/// join; the pre/post statistics semantics match the membership filter.
pub fn inner_join_cohort(table: &Table, cohort: &CohortKeys) -> (Table, FilterStats) {
    let rows_before = table.len();
    let unique_keys_before = table.unique_count("uid");

    let mut joined = Table::empty(&table.columns);
    if let Some(idx) = table.column_index("uid") {
        for row in &table.rows {
            if cohort.contains(&row[idx]) {
                joined.rows.push(row.clone());
            }
        }
    }

    let stats = FilterStats {
        rows_before,
        rows_after: joined.len(),
        unique_keys_before,
        unique_keys_after: joined.unique_count("uid"),
    };
    (joined, stats)
}
