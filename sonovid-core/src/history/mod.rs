// ============================================================================
// sonovid-core/src/history/mod.rs
// ============================================================================
//
// HISTORY: Append-only record of finished conversions
//
// The store is a JSON array of records, read once when opened and rewritten
// in full on every mutation. Reading never fails: a missing or unreadable
// file is an empty history. Write failures are logged and otherwise ignored
// by the mutating operations.
//
// KEY COMPONENTS:
// - HistoryRecord: one finished job
// - HistoryStore: loading, appending, clearing and persisting records
// - HistoryStats: totals for display

use crate::error::CoreResult;
use crate::processing::{JobOutcome, JobReport};
use crate::utils::format_label;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Timestamp format of `HistoryRecord::date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One finished conversion as persisted in the history file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub date: String,
    pub input_file: String,
    /// Empty unless the conversion succeeded
    pub output_file: String,
    pub format: String,
    pub success: bool,
}

impl HistoryRecord {
    #[must_use]
    pub fn new(input: &Path, output: Option<&Path>, success: bool, at: DateTime<Local>) -> Self {
        Self {
            date: at.format(DATE_FORMAT).to_string(),
            input_file: input.display().to_string(),
            output_file: output.map(|p| p.display().to_string()).unwrap_or_default(),
            format: format_label(input),
            success,
        }
    }

    /// Record for a finished job, timestamped now.
    #[must_use]
    pub fn from_report(report: &JobReport) -> Self {
        Self::new(
            &report.input_path,
            report.output_path.as_deref(),
            report.outcome == JobOutcome::Succeeded,
            Local::now(),
        )
    }

    /// File name of the input, for compact listings.
    #[must_use]
    pub fn file_name(&self) -> String {
        Path::new(&self.input_file)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input_file.clone())
    }
}

/// Counts over the whole history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// History file plus its in-memory records.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    /// Opens the history at `path`. Missing or malformed files yield an empty history.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load_records(&path);
        log::debug!(
            "Loaded {} history records from {}",
            records.len(),
            path.display()
        );
        Self { path, records }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Records newest first.
    pub fn recent(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter().rev()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        let succeeded = self.records.iter().filter(|r| r.success).count();
        HistoryStats {
            total: self.records.len(),
            succeeded,
            failed: self.records.len() - succeeded,
        }
    }

    /// Appends a record and rewrites the file.
    pub fn append(&mut self, record: HistoryRecord) {
        self.records.push(record);
        self.persist();
    }

    /// Removes every record and rewrites the file.
    pub fn clear(&mut self) {
        self.records.clear();
        self.persist();
    }

    /// Writes the whole history, creating the parent directory if needed.
    pub fn save(&self) -> CoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.records)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            log::warn!("Failed to save history to {}: {e}", self.path.display());
        }
    }
}

fn load_records(path: &Path) -> Vec<HistoryRecord> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return Vec::new(),
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        log::debug!("Ignoring unreadable history {}: {e}", path.display());
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_fields() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 59).unwrap();
        let record = HistoryRecord::new(
            Path::new("/music/song.m4a"),
            Some(Path::new("/out/song.mp4")),
            true,
            at,
        );
        assert_eq!(record.date, "2024-03-09 14:05");
        assert_eq!(record.format, "M4A");
        assert_eq!(record.output_file, "/out/song.mp4");
        assert_eq!(record.file_name(), "song.m4a");
    }

    #[test]
    fn test_record_from_failed_report_has_empty_output() {
        let report = JobReport::failed(PathBuf::from("/music/track.wav"), "nope");
        let record = HistoryRecord::from_report(&report);
        assert!(!record.success);
        assert_eq!(record.output_file, "");
        assert_eq!(record.format, "WAV");
    }

    #[test]
    fn test_serialized_field_names() {
        let at = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let record = HistoryRecord::new(Path::new("a.ogg"), None, false, at);
        let json = serde_json::to_value(&record).unwrap();
        for key in ["date", "input_file", "output_file", "format", "success"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_stats_and_recent_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = HistoryStore::open(dir.path().join("h.json"));
        let at = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        store.append(HistoryRecord::new(Path::new("1.mp3"), None, false, at));
        store.append(HistoryRecord::new(Path::new("2.mp3"), Some(Path::new("2.mp4")), true, at));

        let names: Vec<String> = store.recent().map(HistoryRecord::file_name).collect();
        assert_eq!(names, vec!["2.mp3", "1.mp3"]);
        assert_eq!(
            store.stats(),
            HistoryStats {
                total: 2,
                succeeded: 1,
                failed: 1
            }
        );
    }
}
