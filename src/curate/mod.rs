//! Per-table curation pipelines. Each table instantiates the shared
//! discover/normalize/assemble/filter/record stages with its own variation;
//! the cohort (grades) pipeline runs first because every other table
//! filters against its persisted output.

pub mod activity;
pub mod app_usage;
pub mod calendar;
pub mod calls;
pub mod classes;
pub mod deadlines;
pub mod dinning;
pub mod grades;
pub mod piazza;
pub mod sms;

mod events;
pub use events::{run_event_table, EventTableSpec, TemporalRule};

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::table::Table;

/// Name of the cohort table every other pipeline filters against.
pub const GRADES_TABLE: &str = "grades";

/// A table curation entry point: configuration in, curated table out.
pub type CurateFn = fn(&Config) -> Result<Table>;

/// Non-cohort pipelines in the order the binary runs them. Each depends on
/// the persisted grades output and nothing else, so the order among them is
/// free; it is kept alphabetical for reproducible logs.
pub const DEPENDENT_TABLES: &[(&str, CurateFn)] = &[
    ("activity", activity::curate),
    ("app_usage", app_usage::curate),
    ("calendar", calendar::curate),
    ("call_log", calls::curate),
    ("class", classes::curate),
    ("deadlines", deadlines::curate),
    ("dinning", dinning::curate),
    ("piazza", piazza::curate),
    ("sms", sms::curate),
];

/// Run the cohort pipeline, then every dependent table.
pub fn run_all(cfg: &Config) -> Result<()> {
    info!(table = GRADES_TABLE, "curating cohort table");
    grades::curate(cfg)?;
    for (name, curate) in DEPENDENT_TABLES {
        info!(table = name, "curating");
        curate(cfg)?;
    }
    Ok(())
}
