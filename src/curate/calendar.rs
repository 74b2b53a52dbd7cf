//! Event-level calendar table. The raw `DATE` field is not self-consistent
//! across files: month/day/year and year/month/day both occur, so the
//! candidate formats are tried in that order.

use crate::config::Config;
use crate::curate::{run_event_table, EventTableSpec, TemporalRule};
use crate::discover::MatchRule;
use crate::error::Result;
use crate::normalize::temporal::TemporalEncoding;
use crate::table::Table;

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y/%m/%d"];

static SPEC: EventTableSpec = EventTableSpec {
    table: "calendar",
    source_subdir: "calendar",
    rule: MatchRule {
        extension: "csv",
        prefix: None,
    },
    headerless_columns: None,
    renames: &[],
    temporal: &[TemporalRule {
        column: "DATE",
        target: None,
        encoding: TemporalEncoding::Calendar(DATE_FORMATS),
        invalid_stat: None,
    }],
    empty_columns: &["DATE", "uid"],
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
    fn mixed_date_formats_normalize_through_the_fallback_chain() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let cfg = config(dir.path());

        fs::create_dir_all(cfg.base_path.join("calendar"))?;
        fs::create_dir_all(&cfg.processed_data_path)?;
        fs::write(cfg.processed_file("grades"), "uid,gpa\nu1,3.5\n")?;
        fs::write(
            cfg.base_path.join("calendar/calendar_u1.csv"),
            "DATE,EVENT\n03/05/2013,lecture\n2013/03/06,lab\nnever,broken\n",
        )?;

        let table = curate(&cfg)?;
        assert_eq!(table.rows[0][0], "2013-03-05");
        assert_eq!(table.rows[1][0], "2013-03-06");
        // unparseable dates stay as rows with the invalid marker
        assert_eq!(table.rows[2][0], "");
        assert_eq!(table.rows[2][1], "broken");
        Ok(())
    }
}
