use std::fs;
use std::path::Path;

use crate::error::{CurateError, Result};
use crate::table::Table;

/// Melt a wide table (one row per subject, one column per observation) into
/// long format: one row per (subject, observation) pair. Subjects keep
/// their input order, and observation columns keep their header order
/// within a subject. `key_idx` must point at the subject-key column of
/// `wide`; the output layout is `[key, var_name, value_name]`.
pub fn melt(wide: &Table, key_idx: usize, var_name: &str, value_name: &str) -> Table {
    let key_name = wide.columns[key_idx].clone();
    let observation_cols: Vec<usize> = (0..wide.columns.len()).filter(|i| *i != key_idx).collect();

    let mut long = Table::empty(&[key_name.as_str(), var_name, value_name]);
    for row in &wide.rows {
        for &col in &observation_cols {
            long.rows.push(vec![
                row[key_idx].clone(),
                wide.columns[col].clone(),
                row[col].clone(),
            ]);
        }
    }
    long
}

/// Parse a ragged delimited file: each line is a subject key followed by a
/// variable number of observation tokens. Tokens are trimmed, empty tokens
/// are skipped, and retained tokens get a 1-based positional index within
/// their subject. Subjects with zero retained tokens are dropped.
pub fn parse_ragged_lines(
    path: &Path,
    key_name: &str,
    index_name: &str,
    value_name: &str,
) -> Result<Table> {
    let text = fs::read_to_string(path).map_err(|e| CurateError::io(path, e))?;

    let mut out = Table::empty(&[key_name, index_name, value_name]);
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = line.split(',').map(str::trim).filter(|t| !t.is_empty());
        let Some(key) = tokens.next() else { continue };

        let mut index = 0usize;
        for token in tokens {
            index += 1;
            out.rows
                .push(vec![key.to_string(), index.to_string(), token.to_string()]);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn melt_produces_one_row_per_subject_observation_pair() {
        let wide = Table {
            columns: vec!["uid".into(), "2019-01-01".into(), "2019-01-02".into()],
            rows: vec![
                vec!["u1".into(), "2".into(), "0".into()],
                vec!["u2".into(), "".into(), "1".into()],
            ],
        };
        let long = melt(&wide, 0, "date_str", "num_deadlines");

        assert_eq!(long.columns, vec!["uid", "date_str", "num_deadlines"]);
        assert_eq!(long.len(), 4);
        assert_eq!(long.rows[0], vec!["u1", "2019-01-01", "2"]);
        assert_eq!(long.rows[3], vec!["u2", "2019-01-02", "1"]);
    }

    #[test]
    fn melt_keeps_subject_order() {
        let wide = Table {
            columns: vec!["uid".into(), "d1".into()],
            rows: vec![
                vec!["u9".into(), "1".into()],
                vec!["u1".into(), "2".into()],
            ],
        };
        let long = melt(&wide, 0, "var", "value");
        assert_eq!(long.rows[0][0], "u9");
        assert_eq!(long.rows[1][0], "u1");
    }

    #[test]
    fn ragged_lines_skip_empty_tokens_and_index_retained_ones() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("class.csv");
        fs::write(&path, "u7,CS101,,CS202\nu8\n\nu9, ,PHYS1\n")?;

        let t = parse_ragged_lines(&path, "uid", "course_index", "course_raw")?;
        assert_eq!(
            t.rows,
            vec![
                vec!["u7".to_string(), "1".to_string(), "CS101".to_string()],
                vec!["u7".to_string(), "2".to_string(), "CS202".to_string()],
                vec!["u9".to_string(), "1".to_string(), "PHYS1".to_string()],
            ]
        );
        Ok(())
    }
}
