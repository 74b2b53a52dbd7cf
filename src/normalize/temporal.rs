use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::table::Table;

/// How a raw temporal field is encoded in a source table.
#[derive(Debug, Clone, Copy)]
pub enum TemporalEncoding {
    /// Unix epoch seconds.
    EpochSeconds,
    /// Unix epoch milliseconds.
    EpochMillis,
    /// Calendar date/time strings, candidate formats tried in order. The
    /// first successful parse wins; later formats are never attempted.
    Calendar(&'static [&'static str]),
}

impl TemporalEncoding {
    /// Human-readable description used in provenance operation lists.
    pub fn describe(&self) -> String {
        match self {
            TemporalEncoding::EpochSeconds => "Unix seconds".to_string(),
            TemporalEncoding::EpochMillis => "Unix milliseconds".to_string(),
            TemporalEncoding::Calendar(formats) => {
                format!("calendar formats [{}]", formats.join(", "))
            }
        }
    }
}

/// Parse one raw field into an absolute point in time. `None` is the
/// explicit invalid marker; a value that fails every candidate parse never
/// fails the run.
pub fn parse_instant(raw: &str, encoding: TemporalEncoding) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match encoding {
        TemporalEncoding::EpochSeconds => {
            let secs: f64 = raw.parse().ok()?;
            DateTime::<Utc>::from_timestamp_millis((secs * 1000.0).round() as i64)
                .map(|dt| dt.naive_utc())
        }
        TemporalEncoding::EpochMillis => {
            let millis = raw.parse::<f64>().ok()?.round() as i64;
            DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
        }
        TemporalEncoding::Calendar(formats) => {
            for fmt in formats {
                if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
                    return Some(dt);
                }
                if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
                    return Some(d.and_time(NaiveTime::MIN));
                }
            }
            None
        }
    }
}

/// Render a normalized instant the way curated tables store it: date only
/// when the time of day is midnight, full seconds precision otherwise.
pub fn render_instant(dt: &NaiveDateTime) -> String {
    if dt.time() == NaiveTime::MIN {
        dt.format("%Y-%m-%d").to_string()
    } else {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Normalize `column` in place, or into `target` when given (the raw column
/// is left untouched). Invalid values become empty cells. Returns the
/// invalid count, or `None` when the column is absent and the operation was
/// skipped.
pub fn normalize_column(
    table: &mut Table,
    column: &str,
    target: Option<&str>,
    encoding: TemporalEncoding,
) -> Option<usize> {
    let idx = table.column_index(column)?;
    let mut invalid = 0usize;
    let normalized: Vec<String> = table
        .rows
        .iter()
        .map(|row| match parse_instant(&row[idx], encoding) {
            Some(dt) => render_instant(&dt),
            None => {
                invalid += 1;
                String::new()
            }
        })
        .collect();
    table.set_column(target.unwrap_or(column), normalized);
    Some(invalid)
}

/// Best-effort numeric coercion; unparseable values become the invalid
/// marker.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}

/// Render a coerced number without floating-point artifacts: integral
/// values print as integers.
pub fn render_numeric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Coerce every value in `column` to numeric, invalid values becoming empty
/// cells. Returns the invalid count, or `None` when the column is absent.
pub fn coerce_numeric_column(table: &mut Table, column: &str) -> Option<usize> {
    let idx = table.column_index(column)?;
    let mut invalid = 0usize;
    let coerced: Vec<String> = table
        .rows
        .iter()
        .map(|row| match coerce_numeric(&row[idx]) {
            Some(v) => render_numeric(v),
            None => {
                invalid += 1;
                String::new()
            }
        })
        .collect();
    table.set_column(column, coerced);
    Some(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_seconds_become_utc_datetimes() {
        let dt = parse_instant("1600000000", TemporalEncoding::EpochSeconds).unwrap();
        assert_eq!(render_instant(&dt), "2020-09-13 12:26:40");
    }

    #[test]
    fn epoch_millis_become_utc_datetimes() {
        let dt = parse_instant("1600000000000", TemporalEncoding::EpochMillis).unwrap();
        assert_eq!(render_instant(&dt), "2020-09-13 12:26:40");
    }

    #[test]
    fn first_matching_format_wins_and_is_never_reattempted() {
        let formats: &[&str] = &["%m/%d/%Y", "%Y/%m/%d"];
        // parseable by the first candidate: month/day/year, so January 2nd
        let dt = parse_instant("01/02/2019", TemporalEncoding::Calendar(formats)).unwrap();
        assert_eq!(render_instant(&dt), "2019-01-02");
        // rejected by the first candidate, accepted by the second
        let dt = parse_instant("2019/03/04", TemporalEncoding::Calendar(formats)).unwrap();
        assert_eq!(render_instant(&dt), "2019-03-04");
    }

    #[test]
    fn unparseable_values_are_markers_not_errors() {
        let formats: &[&str] = &["%Y-%m-%d"];
        assert!(parse_instant("soon", TemporalEncoding::Calendar(formats)).is_none());
        assert!(parse_instant("", TemporalEncoding::EpochSeconds).is_none());
        assert!(parse_instant("abc", TemporalEncoding::EpochMillis).is_none());
    }

    #[test]
    fn normalize_column_counts_invalid_values() {
        let mut t = Table {
            columns: vec!["timestamp".into(), "v".into()],
            rows: vec![
                vec!["1600000000".into(), "a".into()],
                vec!["garbage".into(), "b".into()],
            ],
        };
        let invalid = normalize_column(&mut t, "timestamp", None, TemporalEncoding::EpochSeconds);
        assert_eq!(invalid, Some(1));
        assert_eq!(t.rows[0][0], "2020-09-13 12:26:40");
        assert_eq!(t.rows[1][0], "");
    }

    #[test]
    fn normalize_column_into_a_new_target_keeps_the_raw_value() {
        let formats: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d"];
        let mut t = Table {
            columns: vec!["DATE".into()],
            rows: vec![vec!["2013-04-01 18:30:00".into()]],
        };
        normalize_column(&mut t, "DATE", Some("DATE_TIME"), TemporalEncoding::Calendar(formats));
        assert_eq!(t.columns, vec!["DATE", "DATE_TIME"]);
        assert_eq!(t.rows[0], vec!["2013-04-01 18:30:00", "2013-04-01 18:30:00"]);
    }

    #[test]
    fn absent_column_skips_the_operation() {
        let mut t = Table::empty(&["x"]);
        assert_eq!(
            normalize_column(&mut t, "timestamp", None, TemporalEncoding::EpochSeconds),
            None
        );
    }

    #[test]
    fn numeric_coercion_renders_counts_as_integers() {
        assert_eq!(coerce_numeric("2").map(render_numeric), Some("2".to_string()));
        assert_eq!(coerce_numeric("2.5").map(render_numeric), Some("2.5".to_string()));
        assert_eq!(coerce_numeric("x"), None);
    }
}
