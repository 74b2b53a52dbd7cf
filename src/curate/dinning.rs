//! Event-level dining-hall table. The raw dumps are headerless TXT files
//! (the source system exported them without a header row), so a fixed
//! default header set is substituted; the parsed date lands in a new
//! `DATE_TIME` column next to the raw `DATE` text. The table keeps the
//! `dinning` spelling of the source directory.

use crate::config::Config;
use crate::curate::{run_event_table, EventTableSpec, TemporalRule};
use crate::discover::MatchRule;
use crate::error::Result;
use crate::normalize::temporal::TemporalEncoding;
use crate::table::Table;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y",
];

static SPEC: EventTableSpec = EventTableSpec {
    table: "dinning",
    source_subdir: "dinning",
    rule: MatchRule {
        extension: "txt",
        prefix: None,
    },
    headerless_columns: Some(&["DATE", "RESTAURANT", "TYPE"]),
    renames: &[],
    temporal: &[TemporalRule {
        column: "DATE",
        target: Some("DATE_TIME"),
        encoding: TemporalEncoding::Calendar(DATE_FORMATS),
        invalid_stat: None,
    }],
    empty_columns: &["DATE", "RESTAURANT", "TYPE", "DATE_TIME", "uid"],
};

pub fn curate(cfg: &Config) -> Result<Table> {
    run_event_table(cfg, &SPEC)
}
