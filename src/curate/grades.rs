//! Cohort table. Every other pipeline filters against this table's
//! persisted subject-key set, so it is curated first and validated
//! hardest: null rows are dropped outright and the GPA range is asserted
//! before anything is written.

use tracing::info;

use crate::config::Config;
use crate::error::{CurateError, Result};
use crate::normalize::{self, temporal};
use crate::provenance::{ProvenanceRecord, StatValue};
use crate::table::Table;

use super::GRADES_TABLE;

#[tracing::instrument(level = "info", skip(cfg))]
pub fn curate(cfg: &Config) -> Result<Table> {
    cfg.ensure_output_dirs()?;

    let source_path = cfg.base_path.join("education").join("grades.csv");
    let processed_path = cfg.processed_file(GRADES_TABLE);

    let mut table = Table::read_csv(&source_path)?;
    normalize::trim_headers(&mut table);
    if table.column_index("uid").is_none() {
        return Err(CurateError::schema(GRADES_TABLE, "uid"));
    }
    normalize::trim_column(&mut table, "uid");

    let row_count_before = table.len();
    let null_rows_before = normalize::null_row_count(&table);

    // no null values may survive in the table the whole build keys off
    normalize::drop_null_rows(&mut table);

    // GPA validation only; the data itself is left untouched
    let mut min_gpa: Option<f64> = None;
    let mut max_gpa: Option<f64> = None;
    let mut invalid_gpa_rows = 0usize;
    if let Some(gpa_idx) = table.column_index("gpa") {
        for row in &table.rows {
            let value = temporal::coerce_numeric(&row[gpa_idx]).ok_or_else(|| {
                CurateError::integrity(
                    GRADES_TABLE,
                    format!("non-numeric gpa value `{}`", row[gpa_idx]),
                )
            })?;
            if value < 0.0 {
                invalid_gpa_rows += 1;
            }
            min_gpa = Some(min_gpa.map_or(value, |m| m.min(value)));
            max_gpa = Some(max_gpa.map_or(value, |m| m.max(value)));
        }
        if invalid_gpa_rows > 0 {
            return Err(CurateError::integrity(
                GRADES_TABLE,
                format!("{invalid_gpa_rows} rows with gpa < 0 after null-row drop"),
            ));
        }
    }

    let row_count_after = table.len();
    let uid_nunique = table.unique_count("uid");
    info!(rows = row_count_after, subjects = uid_nunique, "cleaned cohort table");

    table.write_csv(&processed_path)?;

    let mut record = ProvenanceRecord::for_file(GRADES_TABLE, &source_path, &processed_path);
    record.operation("read CSV");
    record.operation("strip whitespace from column names");
    record.operation("strip whitespace from 'uid'");
    record.operation("drop rows with any null values");
    record.operation("validate GPA column has no values < 0 (if present)");
    record.stats.push("row_count_before", row_count_before);
    record.stats.push("row_count_after", row_count_after);
    record.stats.push("null_rows_before", null_rows_before);
    record.stats.push("uid_nunique_after", uid_nunique);
    record.stats.push("min_gpa_after", StatValue::from(min_gpa));
    record.stats.push("max_gpa_after", StatValue::from(max_gpa));
    record.stats.push("invalid_gpa_rows_after", invalid_gpa_rows);
    record.persist(&cfg.provenance_file(GRADES_TABLE))?;

    Ok(table)
}
