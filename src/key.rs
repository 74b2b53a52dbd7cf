use std::path::Path;

use crate::error::{CurateError, Result};

/// Infer the subject key from a per-subject file name. The key is the final
/// `_`-separated token of the file stem (`events_u42.csv` yields `u42`),
/// trimmed. A stem without a delimited tail segment is an error: silently
/// assigning an empty key would corrupt the cohort filter downstream.
pub fn infer_subject_key(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    let tail = match stem.rsplit_once('_') {
        Some((_, tail)) => tail.trim(),
        None => {
            return Err(CurateError::KeyInference {
                path: path.to_path_buf(),
            })
        }
    };
    if tail.is_empty() {
        return Err(CurateError::KeyInference {
            path: path.to_path_buf(),
        });
    }
    Ok(tail.to_string())
}
