//! Per-subject course lists. The source is not a rectangular table: each
//! line is a subject followed by however many course tokens that subject
//! registered, so it is parsed line by line instead of through the CSV
//! reader.

use tracing::info;

use crate::cohort::{filter_to_cohort, CohortKeys};
use crate::config::Config;
use crate::error::Result;
use crate::normalize::reshape;
use crate::provenance::ProvenanceRecord;
use crate::table::Table;

use super::GRADES_TABLE;

const TABLE: &str = "class";

#[tracing::instrument(level = "info", skip(cfg))]
pub fn curate(cfg: &Config) -> Result<Table> {
    cfg.ensure_output_dirs()?;

    let source_path = cfg.base_path.join("education").join("class.csv");
    let processed_path = cfg.processed_file(TABLE);
    let grades_path = cfg.processed_file(GRADES_TABLE);

    let mut table =
        reshape::parse_ragged_lines(&source_path, "uid", "course_index", "course_raw")?;

    let cohort = CohortKeys::load(&grades_path)?;
    let stats = filter_to_cohort(&mut table, &cohort);
    info!(rows = stats.rows_after, subjects = stats.unique_keys_after, "parsed and filtered");

    table.write_csv(&processed_path)?;

    let mut record = ProvenanceRecord::for_file(TABLE, &source_path, &processed_path)
        .depends_on("grades_table", &grades_path);
    record.operation("read raw non-standard CSV file line-by-line");
    record.operation(
        "for each line: split on commas, first token is uid, remaining tokens are course codes",
    );
    record.operation("create one row per (uid, course) pair with course_index");
    record.operation("strip whitespace from uid and course_raw");
    record.operation("filter rows to keep only uids present in processed grades table");
    record.stats.push("row_count_before_filter", stats.rows_before);
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn config(root: &Path) -> Config {
        Config {
            base_path: root.join("dataset"),
            processed_data_path: root.join("processed_data"),
            provenance_path: root.join("provenance"),
        }
    }

    fn write_fixture(cfg: &Config, grades: &str, classes: &str) {
        let education = cfg.base_path.join("education");
        fs::create_dir_all(&education).unwrap();
        fs::create_dir_all(&cfg.processed_data_path).unwrap();
        fs::write(cfg.processed_file("grades"), grades).unwrap();
        fs::write(education.join("class.csv"), classes).unwrap();
    }

    #[test]
    fn embedded_empty_tokens_are_skipped_and_indexes_count_retained_courses(
    ) -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = config(dir.path());
        write_fixture(&cfg, "uid,gpa\nu7,3.0\n", "u7,CS101,,CS202\n");

        let table = curate(&cfg)?;
        assert_eq!(
            table.rows,
            vec![
                vec!["u7".to_string(), "1".to_string(), "CS101".to_string()],
                vec!["u7".to_string(), "2".to_string(), "CS202".to_string()],
            ]
        );
        Ok(())
    }

    #[test]
    fn subjects_without_courses_and_outside_the_cohort_are_dropped() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = config(dir.path());
        write_fixture(
            &cfg,
            "uid,gpa\nu1,3.0\n",
            "u1,CS101\nu2,CS101,CS102\nu3\n",
        );

        let table = curate(&cfg)?;
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0][0], "u1");

        let text = fs::read_to_string(cfg.provenance_file("class"))?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        // u3 contributed no rows at all, so it is invisible to the filter
        assert_eq!(value["stats"]["row_count_before_filter"], 3);
        assert_eq!(value["stats"]["unique_uids_before_filter"], 2);
        assert_eq!(value["stats"]["unique_uids_after_filter"], 1);
        Ok(())
    }
}
