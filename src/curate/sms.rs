//! Event-level SMS table. No field beyond the timestamp needs
//! normalization; rows with an unparseable timestamp are kept and counted,
//! not dropped.

use crate::config::Config;
use crate::curate::{run_event_table, EventTableSpec, TemporalRule};
use crate::discover::MatchRule;
use crate::error::Result;
use crate::normalize::temporal::TemporalEncoding;
use crate::table::Table;

static SPEC: EventTableSpec = EventTableSpec {
    table: "sms",
    source_subdir: "sms",
    rule: MatchRule {
        extension: "csv",
        prefix: None,
    },
    headerless_columns: None,
    renames: &[],
    temporal: &[TemporalRule {
        column: "timestamp",
        target: None,
        encoding: TemporalEncoding::EpochSeconds,
        invalid_stat: Some("invalid_timestamps_after_normalization"),
    }],
    empty_columns: &["timestamp", "uid"],
};

pub fn curate(cfg: &Config) -> Result<Table> {
    run_event_table(cfg, &SPEC)
}
