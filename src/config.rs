use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CurateError, Result};

/// Shared locations for one curation run. Passed explicitly into every
/// table entry point, so several runs with different roots can coexist in
/// one process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the raw dataset layout.
    pub base_path: PathBuf,
    /// Directory curated tables are written to.
    pub processed_data_path: PathBuf,
    /// Directory provenance records are written to.
    pub provenance_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_path: PathBuf::from("dataset"),
            processed_data_path: PathBuf::from("processed_data"),
            provenance_path: PathBuf::from("provenance"),
        }
    }
}

impl Config {
    /// Load a run configuration from a YAML file.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CurateError::io(path, e))?;
        serde_yaml::from_str(&text).map_err(|e| CurateError::Config {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Create the output directories if they do not exist yet.
    pub fn ensure_output_dirs(&self) -> Result<()> {
        for dir in [&self.processed_data_path, &self.provenance_path] {
            fs::create_dir_all(dir).map_err(|e| CurateError::io(dir, e))?;
        }
        Ok(())
    }

    /// Path of a curated table's delimited output.
    pub fn processed_file(&self, table: &str) -> PathBuf {
        self.processed_data_path.join(format!("{table}.csv"))
    }

    /// Path of a curated table's provenance record.
    pub fn provenance_file(&self, table: &str) -> PathBuf {
        self.provenance_path.join(format!("{table}_provenance.json"))
    }
}
