//! The generic event-table pipeline: many per-subject raw files become one
//! event-level table. Instantiated once per table with an [`EventTableSpec`].

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::cohort::{filter_to_cohort, CohortKeys};
use crate::config::Config;
use crate::discover::{discover_files, MatchRule};
use crate::error::Result;
use crate::key::infer_subject_key;
use crate::normalize::{self, temporal};
use crate::provenance::ProvenanceRecord;
use crate::table::Table;

use super::GRADES_TABLE;

/// One temporal field of an event table.
#[derive(Debug)]
pub struct TemporalRule {
    /// Source column holding the raw value.
    pub column: &'static str,
    /// Normalized values land here; `None` rewrites the source column.
    pub target: Option<&'static str>,
    pub encoding: temporal::TemporalEncoding,
    /// Provenance key for the invalid-value count, for tables that report
    /// one for this column.
    pub invalid_stat: Option<&'static str>,
}

/// Declarative description of one event-level table assembled from many
/// per-subject files. Renames and temporal rules are data consumed by the
/// shared pipeline, not per-table code.
#[derive(Debug)]
pub struct EventTableSpec {
    pub table: &'static str,
    /// Source subdirectory under the configured base path.
    pub source_subdir: &'static str,
    pub rule: MatchRule,
    /// Substitute header set for sources that carry none.
    pub headerless_columns: Option<&'static [&'static str]>,
    /// Declarative old-name to new-name header map.
    pub renames: &'static [(&'static str, &'static str)],
    pub temporal: &'static [TemporalRule],
    /// Declared column set of the output when discovery finds nothing.
    pub empty_columns: &'static [&'static str],
}

struct Fragment {
    table: Table,
    /// Invalid counts aligned with the table's temporal rules; `None` marks
    /// a column absent from this file (operation skipped).
    invalid: Vec<Option<usize>>,
}

fn normalize_file(path: &Path, spec: &EventTableSpec) -> Result<Fragment> {
    let mut table = match spec.headerless_columns {
        Some(columns) => Table::read_csv_headless(path, columns)?,
        None => Table::read_csv(path)?,
    };

    normalize::trim_headers(&mut table);
    normalize::apply_renames(&mut table, spec.renames);

    let mut invalid = Vec::with_capacity(spec.temporal.len());
    for rule in spec.temporal {
        invalid.push(temporal::normalize_column(
            &mut table,
            rule.column,
            rule.target,
            rule.encoding,
        ));
    }

    let uid = infer_subject_key(path)?;
    normalize::tag_subject(&mut table, &uid);

    debug!(path = %path.display(), rows = table.len(), "normalized fragment");
    Ok(Fragment { table, invalid })
}

/// Run the shared pipeline for one event table: discover per-subject files,
/// normalize each (in parallel, collected back in the deterministic
/// discovery order), assemble, filter to the cohort, persist the table and
/// its provenance record.
#[tracing::instrument(level = "info", skip(cfg, spec), fields(table = spec.table))]
pub fn run_event_table(cfg: &Config, spec: &EventTableSpec) -> Result<Table> {
    cfg.ensure_output_dirs()?;

    let source_folder = cfg.base_path.join(spec.source_subdir);
    let processed_path = cfg.processed_file(spec.table);
    let grades_path = cfg.processed_file(GRADES_TABLE);

    // a missing cohort dependency is fatal before any work happens
    let cohort = CohortKeys::load(&grades_path)?;

    let files = discover_files(&source_folder, &spec.rule)?;
    let file_count = files.len();
    info!(files = file_count, "discovered raw inputs");

    let fragments: Vec<Fragment> = files
        .par_iter()
        .map(|path| normalize_file(path, spec))
        .collect::<Result<_>>()?;

    let mut invalid_counts = vec![0usize; spec.temporal.len()];
    let mut tables = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        for (i, count) in fragment.invalid.iter().enumerate() {
            invalid_counts[i] += count.unwrap_or(0);
        }
        tables.push(fragment.table);
    }

    let mut table = Table::concat(tables, spec.empty_columns);
    normalize::trim_headers(&mut table);
    normalize::trim_column(&mut table, "uid");

    let stats = filter_to_cohort(&mut table, &cohort);
    info!(
        rows = stats.rows_after,
        subjects = stats.unique_keys_after,
        "assembled and filtered"
    );

    table.write_csv(&processed_path)?;

    let mut record = ProvenanceRecord::for_folder(spec.table, &source_folder, &processed_path)
        .depends_on("grades_table", &grades_path);

    record.operation(format!(
        "discover all {} {} files recursively under {}",
        spec.table,
        spec.rule.extension.to_uppercase(),
        source_folder.display()
    ));
    match spec.headerless_columns {
        Some(columns) => record.operation(format!(
            "for each file: read as CSV with columns [{}]",
            columns.join(", ")
        )),
        None => record.operation("for each file: read CSV"),
    }
    record.operation("strip whitespace from column names");
    for (old, new) in spec.renames {
        record.operation(format!("rename '{old}' to '{new}' (if present)"));
    }
    for rule in spec.temporal {
        match rule.target {
            Some(target) => record.operation(format!(
                "parse '{}' from {} into '{}' (if present)",
                rule.column,
                rule.encoding.describe(),
                target
            )),
            None => record.operation(format!(
                "normalize '{}' from {} to datetime (if present)",
                rule.column,
                rule.encoding.describe()
            )),
        }
    }
    record.operation("infer uid from filename suffix and add as 'uid' column");
    record.operation(format!(
        "concatenate all {} files into a single event-level table",
        spec.table
    ));
    record.operation("standardize column names (strip whitespace) and 'uid' formatting");
    record.operation("filter rows to keep only uids present in processed grades table");

    record.stats.push("file_count", file_count);
    record.stats.push("row_count_before_filter", stats.rows_before);
    record.stats.push("row_count_after_filter", stats.rows_after);
    record
        .stats
        .push("unique_uids_before_filter", stats.unique_keys_before);
    record
        .stats
        .push("unique_uids_after_filter", stats.unique_keys_after);
    for (rule, count) in spec.temporal.iter().zip(&invalid_counts) {
        if let Some(key) = rule.invalid_stat {
            record.stats.push(key, *count);
        }
    }

    record.persist(&cfg.provenance_file(spec.table))?;

    Ok(table)
}
