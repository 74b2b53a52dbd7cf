use std::path::{Path, PathBuf};

use glob::glob;
use tracing::{debug, warn};

use crate::error::{CurateError, Result};

/// A table's storage convention: which files under its source root belong
/// to it.
#[derive(Debug, Clone, Copy)]
pub struct MatchRule {
    /// File extension without the dot, e.g. `csv`.
    pub extension: &'static str,
    /// Optional file-name prefix filter.
    pub prefix: Option<&'static str>,
}

/// Enumerate matching files recursively under `root`. Paths are sorted
/// lexicographically so repeat runs over an identical filesystem snapshot
/// see the same order. A missing or empty root yields an empty set, not an
/// error; downstream stages degrade to an empty table.
pub fn discover_files(root: &Path, rule: &MatchRule) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*.{}", root.display(), rule.extension);
    let entries = glob(&pattern).map_err(|e| CurateError::Pattern {
        pattern: pattern.clone(),
        source: e,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!("skipping unreadable glob entry: {e}");
                continue;
            }
        };
        if !path.is_file() {
            continue;
        }
        if let Some(prefix) = rule.prefix {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if !name.starts_with(prefix) {
                continue;
            }
        }
        paths.push(path);
    }
    paths.sort();

    debug!(count = paths.len(), pattern = %pattern, "discovered input files");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CSV_RULE: MatchRule = MatchRule {
        extension: "csv",
        prefix: None,
    };

    #[test]
    fn finds_files_recursively_in_sorted_order() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::create_dir_all(dir.path().join("nested"))?;
        fs::write(dir.path().join("b_u2.csv"), "x\n")?;
        fs::write(dir.path().join("nested/a_u1.csv"), "x\n")?;
        fs::write(dir.path().join("ignored.txt"), "x\n")?;

        let found = discover_files(dir.path(), &CSV_RULE)?;
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("b_u2.csv"));
        assert!(found[1].ends_with("nested/a_u1.csv"));
        Ok(())
    }

    #[test]
    fn prefix_filter_narrows_the_match() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("activity_u1.csv"), "x\n")?;
        fs::write(dir.path().join("audio_u1.csv"), "x\n")?;

        let rule = MatchRule {
            extension: "csv",
            prefix: Some("activity"),
        };
        let found = discover_files(dir.path(), &rule)?;
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("activity_u1.csv"));
        Ok(())
    }

    #[test]
    fn missing_root_yields_an_empty_set() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let found = discover_files(&dir.path().join("absent"), &CSV_RULE)?;
        assert!(found.is_empty());
        Ok(())
    }
}
