use std::collections::HashSet;
use std::fs::{self, File};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use crate::error::{CurateError, Result};

/// An in-memory delimited table: header names plus string-typed rows.
/// Every row holds exactly one cell per column; an empty cell is the
/// null/invalid marker throughout the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// A well-formed table with the given column set and no rows.
    pub fn empty<S: AsRef<str>>(columns: &[S]) -> Self {
        Table {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of distinct values in a column; 0 when the column is absent.
    pub fn unique_count(&self, name: &str) -> usize {
        match self.column_index(name) {
            Some(idx) => self
                .rows
                .iter()
                .map(|r| r[idx].as_str())
                .collect::<HashSet<_>>()
                .len(),
            None => 0,
        }
    }

    /// Set a column's cells, appending the column if it does not exist yet.
    /// `values` must hold one cell per row.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }

    /// Read a delimited file, taking the first record as the header row.
    pub fn read_csv(path: &Path) -> Result<Table> {
        Self::read_delimited(path, None)
    }

    /// Read a headerless delimited file against a fixed default header set.
    pub fn read_csv_headless(path: &Path, columns: &[&str]) -> Result<Table> {
        Self::read_delimited(path, Some(columns))
    }

    fn read_delimited(path: &Path, default_headers: Option<&[&str]>) -> Result<Table> {
        let file = File::open(path).map_err(|e| CurateError::io(path, e))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut columns: Vec<String> = default_headers
            .map(|cols| cols.iter().map(|c| c.to_string()).collect())
            .unwrap_or_default();
        let mut rows = Vec::new();

        for (idx, record) in reader.records().enumerate() {
            let record = record.map_err(|e| CurateError::malformed(path, e))?;
            if idx == 0 && default_headers.is_none() {
                columns = record.iter().map(str::to_string).collect();
                continue;
            }
            // ragged records are padded (or truncated) to the header width
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(columns.len(), String::new());
            rows.push(row);
        }

        debug!(path = %path.display(), rows = rows.len(), "read delimited file");
        Ok(Table { columns, rows })
    }

    /// Persist as a flat delimited file: header row plus data rows, no index
    /// column. The table is written to a temporary sibling first and renamed
    /// into place so a failed run leaves no partial output behind.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("csv.tmp");
        if self.columns.is_empty() {
            fs::write(&tmp, "").map_err(|e| CurateError::io(&tmp, e))?;
        } else {
            let file = File::create(&tmp).map_err(|e| CurateError::io(&tmp, e))?;
            let mut writer = WriterBuilder::new().from_writer(file);
            writer
                .write_record(&self.columns)
                .map_err(|e| CurateError::malformed(&tmp, e))?;
            for row in &self.rows {
                writer
                    .write_record(row)
                    .map_err(|e| CurateError::malformed(&tmp, e))?;
            }
            writer.flush().map_err(|e| CurateError::io(&tmp, e))?;
        }
        fs::rename(&tmp, path).map_err(|e| CurateError::io(path, e))?;
        Ok(())
    }

    /// Concatenate fragments in the given order, aligning columns by name.
    /// Column order is first-appearance order across fragments; cells absent
    /// from a fragment stay empty. Duplicate rows are preserved. Zero
    /// fragments yield a well-formed empty table with `fallback_columns`.
    pub fn concat(fragments: Vec<Table>, fallback_columns: &[&str]) -> Table {
        if fragments.is_empty() {
            return Table::empty(fallback_columns);
        }

        let mut columns: Vec<String> = Vec::new();
        for fragment in &fragments {
            for col in &fragment.columns {
                if !columns.contains(col) {
                    columns.push(col.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for fragment in fragments {
            let mapping: Vec<Option<usize>> =
                columns.iter().map(|c| fragment.column_index(c)).collect();
            for row in &fragment.rows {
                rows.push(
                    mapping
                        .iter()
                        .map(|m| m.map(|i| row[i].clone()).unwrap_or_default())
                        .collect(),
                );
            }
        }

        Table { columns, rows }
    }
}
