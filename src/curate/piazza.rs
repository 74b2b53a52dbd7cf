//! Piazza engagement metrics. A fixed-schema survey export: metric columns
//! are coerced to numeric, null rows are dropped, and the result is joined
//! row-for-row against the cohort table rather than filtered by key set.

use tracing::info;

use crate::cohort::{inner_join_cohort, CohortKeys};
use crate::config::Config;
use crate::error::{CurateError, Result};
use crate::normalize::{self, temporal};
use crate::provenance::ProvenanceRecord;
use crate::table::Table;

use super::GRADES_TABLE;

const TABLE: &str = "piazza";

/// Metric columns coerced to numeric when present.
const NUMERIC_COLUMNS: &[&str] = &[
    "days online",
    "views",
    "contributions",
    "questions",
    "notes",
    "answers",
];

#[tracing::instrument(level = "info", skip(cfg))]
pub fn curate(cfg: &Config) -> Result<Table> {
    cfg.ensure_output_dirs()?;

    let source_path = cfg.base_path.join("education").join("piazza.csv");
    let processed_path = cfg.processed_file(TABLE);
    let grades_path = cfg.processed_file(GRADES_TABLE);

    let mut table = Table::read_csv(&source_path)?;
    normalize::trim_headers(&mut table);
    if table.column_index("uid").is_none() {
        return Err(CurateError::schema(TABLE, "uid"));
    }
    normalize::trim_column(&mut table, "uid");

    let row_count_before = table.len();
    let null_rows_before = normalize::null_row_count(&table);

    for column in NUMERIC_COLUMNS {
        temporal::coerce_numeric_column(&mut table, column);
    }

    // coercion failures became markers; the drop below removes them along
    // with rows that arrived null
    normalize::drop_null_rows(&mut table);
    let row_count_after_dropna = table.len();
    let null_rows_after = normalize::null_row_count(&table);

    let cohort = CohortKeys::load(&grades_path)?;
    let (table, stats) = inner_join_cohort(&table, &cohort);
    info!(rows = stats.rows_after, subjects = stats.unique_keys_after, "joined with cohort");

    table.write_csv(&processed_path)?;

    let mut record = ProvenanceRecord::for_file(TABLE, &source_path, &processed_path)
        .depends_on("grades_table", &grades_path);
    record.operation("read CSV");
    record.operation("strip whitespace from column names");
    record.operation("standardize 'uid' formatting (string, stripped)");
    record.operation("coerce piazza metric columns to numeric, invalid values become markers");
    record.operation("drop rows with any null values after type coercion");
    record.operation("inner-join with processed grades table on 'uid' to keep only valid students");
    record.stats.push("row_count_before", row_count_before);
    record.stats.push("null_rows_before", null_rows_before);
    record.stats.push("row_count_after_dropna", row_count_after_dropna);
    record.stats.push("null_rows_after_dropna", null_rows_after);
    record
        .stats
        .push("unique_uids_before_merge", stats.unique_keys_before);
    record.stats.push("row_count_after_merge", stats.rows_after);
    record
        .stats
        .push("unique_uids_after_merge", stats.unique_keys_after);
    record.persist(&cfg.provenance_file(TABLE))?;

    Ok(table)
}
