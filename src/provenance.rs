use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::info;

use crate::error::{CurateError, Result};

/// One statistic: a plain integer, float, or null. Counts serialize as
/// integers, never as floating-point artifacts of an intermediate
/// representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatValue {
    Int(i64),
    Float(f64),
    Null,
}

impl Serialize for StatValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            StatValue::Int(v) => serializer.serialize_i64(*v),
            StatValue::Float(v) => serializer.serialize_f64(*v),
            StatValue::Null => serializer.serialize_none(),
        }
    }
}

impl From<usize> for StatValue {
    fn from(v: usize) -> Self {
        StatValue::Int(v as i64)
    }
}

impl From<i64> for StatValue {
    fn from(v: i64) -> Self {
        StatValue::Int(v)
    }
}

impl From<f64> for StatValue {
    fn from(v: f64) -> Self {
        StatValue::Float(v)
    }
}

impl From<Option<f64>> for StatValue {
    fn from(v: Option<f64>) -> Self {
        v.map(StatValue::Float).unwrap_or(StatValue::Null)
    }
}

/// Checkpoint statistics, serialized as a JSON object in insertion order so
/// keys stay stable across runs of the same table.
#[derive(Debug, Default)]
pub struct Stats(Vec<(String, StatValue)>);

impl Stats {
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<StatValue>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<StatValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }
}

impl Serialize for Stats {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Structured description of one curation run: what was read, what was
/// done, and with what statistics. Write-once; a rerun overwrites the
/// prior record for the table.
#[derive(Debug, Serialize)]
pub struct ProvenanceRecord {
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_folder: Option<String>,
    pub processed_file: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub depends_on: BTreeMap<String, String>,
    pub operations: Vec<String>,
    pub stats: Stats,
}

impl ProvenanceRecord {
    /// A record for a table curated from one fixed source file.
    pub fn for_file(table: &str, source: &Path, processed: &Path) -> Self {
        ProvenanceRecord {
            table: table.to_string(),
            source_file: Some(source.display().to_string()),
            source_folder: None,
            processed_file: processed.display().to_string(),
            depends_on: BTreeMap::new(),
            operations: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// A record for a table assembled from files discovered under a folder.
    pub fn for_folder(table: &str, source: &Path, processed: &Path) -> Self {
        ProvenanceRecord {
            table: table.to_string(),
            source_file: None,
            source_folder: Some(source.display().to_string()),
            processed_file: processed.display().to_string(),
            depends_on: BTreeMap::new(),
            operations: Vec::new(),
            stats: Stats::default(),
        }
    }

    /// Declare an upstream table this run read, documenting build order.
    pub fn depends_on(mut self, name: &str, path: &Path) -> Self {
        self.depends_on
            .insert(name.to_string(), path.display().to_string());
        self
    }

    pub fn operation(&mut self, op: impl Into<String>) {
        self.operations.push(op.into());
    }

    /// Persist as pretty-printed JSON. All-or-nothing: the record is
    /// written to a temporary sibling and renamed into place, so a failure
    /// mid-write leaves no partial record.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        {
            let file = File::create(&tmp).map_err(|e| CurateError::io(&tmp, e))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, self)
                .map_err(|e| CurateError::io(&tmp, e.into()))?;
            writer.flush().map_err(|e| CurateError::io(&tmp, e))?;
        }
        fs::rename(&tmp, path).map_err(|e| CurateError::io(path, e))?;
        info!(table = %self.table, path = %path.display(), "wrote provenance record");
        Ok(())
    }
}
