//! Event-level physical-activity table, assembled from per-subject
//! inference files under `sensing/activity/`. The source headers are not
//! self-consistent across files; the one known misspelling is mapped back
//! to the canonical name.

use crate::config::Config;
use crate::curate::{run_event_table, EventTableSpec, TemporalRule};
use crate::discover::MatchRule;
use crate::error::Result;
use crate::normalize::temporal::TemporalEncoding;
use crate::table::Table;

static SPEC: EventTableSpec = EventTableSpec {
    table: "activity",
    source_subdir: "sensing/activity",
    rule: MatchRule {
        extension: "csv",
        prefix: Some("activity"),
    },
    headerless_columns: None,
    renames: &[("activity inference", "activity_inference")],
    temporal: &[TemporalRule {
        column: "timestamp",
        target: None,
        encoding: TemporalEncoding::EpochSeconds,
        invalid_stat: Some("invalid_timestamps_after_normalization"),
    }],
    empty_columns: &["timestamp", "activity_inference", "uid"],
};

pub fn curate(cfg: &Config) -> Result<Table> {
    run_event_table(cfg, &SPEC)
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

    #[test]
    fn renames_the_inference_header_and_normalizes_timestamps() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = config(dir.path());

        fs::create_dir_all(cfg.base_path.join("sensing/activity"))?;
        fs::create_dir_all(&cfg.processed_data_path)?;
        fs::write(cfg.processed_file("grades"), "uid,gpa\nu1,3.5\n")?;
        fs::write(
            cfg.base_path.join("sensing/activity/activity_u1.csv"),
            " timestamp ,activity inference\n1600000000,2\n",
        )?;

        let table = curate(&cfg)?;
        assert_eq!(table.columns, vec!["timestamp", "activity_inference", "uid"]);
        assert_eq!(
            table.rows,
            vec![vec![
                "2020-09-13 12:26:40".to_string(),
                "2".to_string(),
                "u1".to_string()
            ]]
        );
        Ok(())
    }

    #[test]
    fn prefix_filter_ignores_other_sensor_dumps() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = config(dir.path());

        fs::create_dir_all(cfg.base_path.join("sensing/activity"))?;
        fs::create_dir_all(&cfg.processed_data_path)?;
        fs::write(cfg.processed_file("grades"), "uid,gpa\nu1,3.5\n")?;
        fs::write(
            cfg.base_path.join("sensing/activity/audio_u1.csv"),
            "timestamp,level\n1600000000,3\n",
        )?;

        let table = curate(&cfg)?;
        assert!(table.is_empty());
        assert_eq!(table.columns, vec!["timestamp", "activity_inference", "uid"]);
        Ok(())
    }
}
