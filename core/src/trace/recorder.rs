//! Trace recorder implementation

use crate::error::{Result, TraceError};
use crate::trace::{TraceEntry, TraceEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, RwLock};

/// Records workflow runs for debugging and analysis
pub struct TraceRecorder {
    entries: RwLock<Vec<TraceEntry>>,
    file_path: Option<PathBuf>,
    auto_save: bool,
    /// Serializes snapshot-and-write so a stale snapshot never lands last
    save_lock: Mutex<()>,
}

/// Complete trace data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    /// Metadata about the trace
    pub metadata: TraceMetadata,

    /// All trace entries
    pub entries: Vec<TraceEntry>,
}

/// Metadata for a trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceMetadata {
    /// Unique identifier for this trace
    pub id: String,

    /// Time of the first entry
    pub started_at: DateTime<Utc>,

    /// Time of the last entry
    pub completed_at: Option<DateTime<Utc>>,

    /// Version of the trace format
    pub version: String,

    /// Number of distinct runs
    pub run_count: usize,

    /// Number of runs that ended with an error
    pub failed_runs: usize,
}

impl TraceRecorder {
    /// Create a new in-memory trace recorder
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            file_path: None,
            auto_save: false,
            save_lock: Mutex::new(()),
        }
    }

    /// Create a trace recorder that saves to a file after every entry
    pub fn with_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            file_path: Some(path.as_ref().to_path_buf()),
            auto_save: true,
            save_lock: Mutex::new(()),
        }
    }

    /// Record a trace entry
    pub async fn record(&self, entry: TraceEntry) -> Result<()> {
        {
            let mut entries = self.entries.write().await;
            entries.push(entry);
        }

        if self.auto_save {
            self.save().await?;
        }

        Ok(())
    }

    /// Get all recorded entries
    pub async fn get_entries(&self) -> Vec<TraceEntry> {
        self.entries.read().await.clone()
    }

    /// Get the number of recorded entries
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Save the trace to file
    ///
    /// The file is replaced atomically through a sibling temp file, so
    /// readers never observe a partial trace.
    pub async fn save(&self) -> Result<()> {
        if let Some(path) = &self.file_path {
            let _guard = self.save_lock.lock().await;
            let trace = self.build_trace().await;
            let json = serde_json::to_string_pretty(&trace).map_err(|e| {
                TraceError::RecordingFailed {
                    message: format!("Failed to serialize trace: {}", e),
                }
            })?;

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }

            let tmp_path = path.with_extension("json.tmp");
            fs::write(&tmp_path, json).await?;
            fs::rename(&tmp_path, path).await?;
        }

        Ok(())
    }

    /// Load a trace from file
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Trace> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TraceError::LoadFailed {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = fs::read_to_string(path).await?;
        let trace: Trace = serde_json::from_str(&content).map_err(|_| TraceError::InvalidFormat)?;

        Ok(trace)
    }

    async fn build_trace(&self) -> Trace {
        let entries = self.entries.read().await.clone();

        let started_at = entries
            .first()
            .map(|e| e.timestamp)
            .unwrap_or_else(Utc::now);
        let completed_at = entries.last().map(|e| e.timestamp);

        let run_count = entries
            .iter()
            .map(|e| e.run_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let failed_runs = entries
            .iter()
            .filter(|e| matches!(&e.event, TraceEvent::RunCompleted { error: Some(_), .. }))
            .count();

        let metadata = TraceMetadata {
            id: uuid::Uuid::new_v4().to_string(),
            started_at,
            completed_at,
            version: "1.0".to_string(),
            run_count,
            failed_runs,
        };

        Trace { metadata, entries }
    }

    /// Clear all recorded entries
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Get the file path if set
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_record_and_clear() {
        let recorder = TraceRecorder::new();
        recorder
            .record(TraceEntry::run_started("a", "2 + 3"))
            .await
            .unwrap();
        assert_eq!(recorder.entry_count().await, 1);

        recorder.clear().await;
        assert_eq!(recorder.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_auto_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("trace.json");
        let recorder = TraceRecorder::with_file(&path);

        recorder.record(TraceEntry::run_started("a", "q1")).await.unwrap();
        recorder
            .record(TraceEntry::run_completed("a", "calculator", None, 3))
            .await
            .unwrap();
        recorder.record(TraceEntry::run_started("b", "q2")).await.unwrap();
        recorder
            .record(TraceEntry::run_completed("b", "missing", Some("알 수 없는 도구: missing"), 1))
            .await
            .unwrap();

        let trace = TraceRecorder::load(&path).await.unwrap();
        assert_eq!(trace.entries.len(), 4);
        assert_eq!(trace.metadata.run_count, 2);
        assert_eq!(trace.metadata.failed_runs, 1);
        assert_eq!(trace.entries, recorder.get_entries().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_auto_save_keeps_every_entry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trace.json");

        for round in 0..10 {
            let recorder = std::sync::Arc::new(TraceRecorder::with_file(&path));
            let handles: Vec<_> = (0..32)
                .map(|i| {
                    let recorder = recorder.clone();
                    tokio::spawn(async move {
                        let run_id = format!("run-{}-{}", round, i);
                        recorder
                            .record(TraceEntry::run_started(&run_id, "2 + 3"))
                            .await
                    })
                })
                .collect();

            for handle in handles {
                handle.await.unwrap().unwrap();
            }

            let trace = TraceRecorder::load(&path).await.unwrap();
            assert_eq!(trace.entries.len(), 32);
            assert_eq!(trace.metadata.run_count, 32);
            assert!(!path.with_extension("json.tmp").exists());
        }
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(TraceRecorder::load(dir.path().join("absent.json")).await.is_err());
    }

    #[tokio::test]
    async fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(TraceRecorder::load(&path).await.is_err());
    }
}
