//! Event-level app-usage table, one row per recorded foreground app event.

use crate::config::Config;
use crate::curate::{run_event_table, EventTableSpec, TemporalRule};
use crate::discover::MatchRule;
use crate::error::Result;
use crate::normalize::temporal::TemporalEncoding;
use crate::table::Table;

static SPEC: EventTableSpec = EventTableSpec {
    table: "app_usage",
    source_subdir: "app_usage",
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
