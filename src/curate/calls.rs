//! Event-level call-log table. Two temporal encodings coexist in the raw
//! files: the capture timestamp in Unix seconds and the handset's own
//! `CALLS_date` in Unix milliseconds.

use crate::config::Config;
use crate::curate::{run_event_table, EventTableSpec, TemporalRule};
use crate::discover::MatchRule;
use crate::error::Result;
use crate::normalize::temporal::TemporalEncoding;
use crate::table::Table;

static SPEC: EventTableSpec = EventTableSpec {
    table: "call_log",
    source_subdir: "call_log",
    rule: MatchRule {
        extension: "csv",
        prefix: None,
    },
    headerless_columns: None,
    renames: &[],
    temporal: &[
        TemporalRule {
            column: "timestamp",
            target: None,
            encoding: TemporalEncoding::EpochSeconds,
            invalid_stat: Some("invalid_timestamps_after_normalization"),
        },
        TemporalRule {
            column: "CALLS_date",
            target: None,
            encoding: TemporalEncoding::EpochMillis,
            invalid_stat: None,
        },
    ],
    empty_columns: &["timestamp", "CALLS_date", "uid"],
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
    fn both_temporal_encodings_are_normalized() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = config(dir.path());

        fs::create_dir_all(cfg.base_path.join("call_log"))?;
        fs::create_dir_all(&cfg.processed_data_path)?;
        fs::write(cfg.processed_file("grades"), "uid,gpa\nu1,3.5\n")?;
        fs::write(
            cfg.base_path.join("call_log/calls_u1.csv"),
            "timestamp,CALLS_date,CALLS_type\n1600000000,1600000000000,incoming\n",
        )?;

        let table = curate(&cfg)?;
        assert_eq!(
            table.rows,
            vec![vec![
                "2020-09-13 12:26:40".to_string(),
                "2020-09-13 12:26:40".to_string(),
                "incoming".to_string(),
                "u1".to_string(),
            ]]
        );
        Ok(())
    }

    #[test]
    fn a_file_without_a_key_suffix_aborts_the_run() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = config(dir.path());

        fs::create_dir_all(cfg.base_path.join("call_log"))?;
        fs::create_dir_all(&cfg.processed_data_path)?;
        fs::write(cfg.processed_file("grades"), "uid,gpa\nu1,3.5\n")?;
        fs::write(cfg.base_path.join("call_log/calls.csv"), "timestamp\n1\n")?;

        let err = curate(&cfg).unwrap_err();
        assert!(matches!(err, crate::error::CurateError::KeyInference { .. }));
        // an aborted run leaves no output behind
        assert!(!cfg.processed_file("call_log").exists());
        assert!(!cfg.provenance_file("call_log").exists());
        Ok(())
    }
}
