//! Per-day deadline counts, reshaped from a wide date-keyed source table.
//! Every non-key column name is itself a date; melting yields one row per
//! (subject, day) pair, and only days that actually carry deadlines
//! survive. A deadlines row without a valid day is meaningless, so this
//! table drops invalid rows instead of annotating them.

use tracing::info;

use crate::cohort::{filter_to_cohort, CohortKeys};
use crate::config::Config;
use crate::error::{CurateError, Result};
use crate::normalize::{self, reshape, temporal};
use crate::provenance::ProvenanceRecord;
use crate::table::Table;

use super::GRADES_TABLE;

const TABLE: &str = "deadlines";
const DATE_FORMATS: &[&str] = &["%Y-%m-%d"];

#[tracing::instrument(level = "info", skip(cfg))]
pub fn curate(cfg: &Config) -> Result<Table> {
    cfg.ensure_output_dirs()?;

    let source_path = cfg.base_path.join("education").join("deadlines.csv");
    let processed_path = cfg.processed_file(TABLE);
    let grades_path = cfg.processed_file(GRADES_TABLE);

    let mut wide = Table::read_csv(&source_path)?;
    normalize::trim_headers(&mut wide);
    let uid_idx = wide
        .column_index("uid")
        .ok_or_else(|| CurateError::schema(TABLE, "uid"))?;
    normalize::trim_column(&mut wide, "uid");

    let row_count_wide = wide.len();
    let num_date_columns = wide.columns.len() - 1;

    let long = reshape::melt(&wide, uid_idx, "date_str", "num_deadlines");
    let row_count_long_before_clean = long.len();

    // melt layout: [uid, date_str, num_deadlines]
    let mut table = Table::empty(&["uid", "date", "num_deadlines"]);
    for row in &long.rows {
        let Some(count) = temporal::coerce_numeric(&row[2]) else {
            continue;
        };
        let Some(date) =
            temporal::parse_instant(&row[1], temporal::TemporalEncoding::Calendar(DATE_FORMATS))
        else {
            continue;
        };
        if count <= 0.0 {
            continue;
        }
        table.rows.push(vec![
            row[0].trim().to_string(),
            temporal::render_instant(&date),
            (count as i64).to_string(),
        ]);
    }

    let cohort = CohortKeys::load(&grades_path)?;
    let stats = filter_to_cohort(&mut table, &cohort);

    // deterministic output order
    table.rows.sort_by(|a, b| a[..2].cmp(&b[..2]));
    info!(rows = stats.rows_after, subjects = stats.unique_keys_after, "reshaped and filtered");

    table.write_csv(&processed_path)?;

    let mut record = ProvenanceRecord::for_file(TABLE, &source_path, &processed_path)
        .depends_on("grades_table", &grades_path);
    record.operation("read wide-format deadlines CSV");
    record.operation("strip whitespace from column names and 'uid'");
    record.operation("identify all date columns (all columns except 'uid')");
    record.operation("melt wide table into long format with columns [uid, date_str, num_deadlines]");
    record.operation("coerce num_deadlines to numeric, invalid values become markers");
    record.operation("parse date_str into 'date' (format '%Y-%m-%d')");
    record.operation("drop rows with invalid date or missing num_deadlines");
    record.operation("keep only rows with num_deadlines > 0 (days that actually have deadlines)");
    record.operation("standardize 'uid' formatting and num_deadlines as int");
    record.operation("filter rows to keep only uids present in processed grades table");
    record.operation("sort by (uid, date)");
    record.stats.push("row_count_wide", row_count_wide);
    record.stats.push("num_date_columns", num_date_columns);
    record
        .stats
        .push("row_count_long_before_clean", row_count_long_before_clean);
    record.stats.push("row_count_after_filter", stats.rows_after);
    record
        .stats
        .push("unique_uids_before_filter", stats.unique_keys_before);
    record
        .stats
        .push("unique_uids_after_filter", stats.unique_keys_after);
    record.persist(&cfg.provenance_file(TABLE))?;

    Ok(table)
}
