pub mod reshape;
pub mod temporal;

use crate::table::Table;

/// Trim surrounding whitespace from every column name.
pub fn trim_headers(table: &mut Table) {
    for col in &mut table.columns {
        *col = col.trim().to_string();
    }
}

/// Apply a declarative old-name to new-name map to column headers. Returns
/// the old names actually present and renamed.
pub fn apply_renames(table: &mut Table, renames: &[(&str, &str)]) -> Vec<String> {
    let mut applied = Vec::new();
    for (old, new) in renames {
        if let Some(idx) = table.column_index(old) {
            table.columns[idx] = (*new).to_string();
            applied.push((*old).to_string());
        }
    }
    applied
}

/// Trim cell whitespace in one column, if the column exists.
pub fn trim_column(table: &mut Table, name: &str) {
    if let Some(idx) = table.column_index(name) {
        for row in &mut table.rows {
            row[idx] = row[idx].trim().to_string();
        }
    }
}

/// Tag every row with the inferred subject key, overwriting any `uid`
/// column the raw file happened to carry.
pub fn tag_subject(table: &mut Table, key: &str) {
    let values = vec![key.to_string(); table.len()];
    table.set_column("uid", values);
}

/// Rows holding at least one empty cell.
pub fn null_row_count(table: &Table) -> usize {
    table
        .rows
        .iter()
        .filter(|r| r.iter().any(|c| c.trim().is_empty()))
        .count()
}

/// Drop every row holding at least one empty cell.
pub fn drop_null_rows(table: &mut Table) {
    table
        .rows
        .retain(|r| r.iter().all(|c| !c.trim().is_empty()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn headers_are_trimmed_and_renamed() {
        let mut t = table(&[" activity inference ", "timestamp"], &[]);
        trim_headers(&mut t);
        let applied = apply_renames(&mut t, &[("activity inference", "activity_inference")]);
        assert_eq!(t.columns, vec!["activity_inference", "timestamp"]);
        assert_eq!(applied, vec!["activity inference"]);
    }

    #[test]
    fn rename_of_an_absent_column_is_skipped() {
        let mut t = table(&["timestamp"], &[]);
        let applied = apply_renames(&mut t, &[("activity inference", "activity_inference")]);
        assert!(applied.is_empty());
        assert_eq!(t.columns, vec!["timestamp"]);
    }

    #[test]
    fn tag_subject_overwrites_a_raw_uid_column() {
        let mut t = table(&["uid", "x"], &[&["stale", "1"]]);
        tag_subject(&mut t, "u9");
        assert_eq!(t.rows[0], vec!["u9", "1"]);
    }

    #[test]
    fn null_rows_are_counted_and_dropped() {
        let mut t = table(&["uid", "gpa"], &[&["u1", "3.5"], &["u2", " "], &["", "2.0"]]);
        assert_eq!(null_row_count(&t), 2);
        drop_null_rows(&mut t);
        assert_eq!(t.len(), 1);
        assert_eq!(t.rows[0][0], "u1");
    }
}
