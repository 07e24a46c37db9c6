// Conversion tracing
// Append-only JSONL log of conversion stages and per-event decisions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::convert::EventDecision;
use crate::notes::Note;

/// Errors that can occur during trace operations
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type TraceResult<T> = Result<T, TraceError>;

/// Stage of a conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionStage {
    /// Reading and validating the source beatmap
    Load,

    /// Turning hit events into notes
    Convert,

    /// Explanation record for a single event
    Decision,

    /// Writing the converted notes
    Write,
}

impl ConversionStage {
    pub fn to_string(&self) -> &'static str {
        match self {
            ConversionStage::Load => "load",
            ConversionStage::Convert => "convert",
            ConversionStage::Decision => "decision",
            ConversionStage::Write => "write",
        }
    }
}

/// A single line of the trace file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub timestamp: DateTime<Utc>,
    pub stage: ConversionStage,

    /// Stage progress in [0.0, 1.0]
    pub progress: f32,

    pub message: String,

    /// Source event the entry refers to, for decision entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_index: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl TraceEntry {
    pub fn new(stage: ConversionStage, progress: f32, message: impl Into<String>) -> Self {
        TraceEntry {
            timestamp: Utc::now(),
            stage,
            progress: progress.clamp(0.0, 1.0),
            message: message.into(),
            event_index: None,
            data: None,
        }
    }

    /// Attach structured data
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Entry explaining how one event was converted
    pub fn from_decision(decision: &EventDecision) -> TraceResult<Self> {
        let mut entry = TraceEntry::new(ConversionStage::Decision, 1.0, decision.reasoning.clone())
            .with_data(serde_json::to_value(decision)?);
        entry.event_index = Some(decision.event_index);
        Ok(entry)
    }

    /// Serialize to a JSON line (with newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

/// Appends entries to a JSONL trace file
pub struct TraceWriter {
    file_path: PathBuf,
}

impl TraceWriter {
    pub fn new(file_path: PathBuf) -> Self {
        TraceWriter { file_path }
    }

    /// Append one entry, creating the file if needed
    pub fn write(&self, entry: &TraceEntry) -> TraceResult<()> {
        self.write_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single open
    pub fn write_batch(&self, entries: &[TraceEntry]) -> TraceResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        for entry in entries {
            file.write_all(entry.to_json_line()?.as_bytes())?;
        }

        file.flush()?;
        Ok(())
    }

    /// Append one decision entry per converted event
    pub fn write_decisions(&self, decisions: &[EventDecision]) -> TraceResult<()> {
        let entries = decisions
            .iter()
            .map(TraceEntry::from_decision)
            .collect::<TraceResult<Vec<_>>>()?;
        log::debug!("Writing {} decision entries to {}", entries.len(), self.file_path.display());
        self.write_batch(&entries)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Shorthand for building stage entries
pub struct TraceBuilder {
    stage: ConversionStage,
}

impl TraceBuilder {
    pub fn stage(stage: ConversionStage) -> Self {
        TraceBuilder { stage }
    }

    pub fn start(self, message: impl Into<String>) -> TraceEntry {
        TraceEntry::new(self.stage, 0.0, message)
    }

    pub fn progress(self, progress: f32, message: impl Into<String>) -> TraceEntry {
        TraceEntry::new(self.stage, progress, message)
    }

    pub fn complete(self, message: impl Into<String>) -> TraceEntry {
        TraceEntry::new(self.stage, 1.0, message)
    }
}

/// Note counts per kind, for the convert stage's completion entry
pub fn summarize_notes(notes: &[Note]) -> serde_json::Value {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for note in notes {
        *counts.entry(note.kind().to_string()).or_insert(0) += 1;
    }
    let breaks = notes.iter().filter(|n| n.is_break()).count();
    let twins = notes.iter().filter(|n| n.has_twin()).count();

    serde_json::json!({
        "total": notes.len(),
        "by_kind": counts,
        "breaks": breaks,
        "twins": twins,
    })
}

/// Read every entry from a JSONL trace file
pub fn read_trace_file(path: &Path) -> TraceResult<Vec<TraceEntry>> {
    let contents = std::fs::read_to_string(path)?;

    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).map_err(TraceError::from))
        .collect()
}
