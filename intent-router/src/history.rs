//! Execution history
//!
//! Append-only record of every plan the router produced. Purely
//! observational: nothing here is read back into classification.
//! Entries live as long as the owning router; an optional JSONL file keeps a
//! copy for diagnostics across restarts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::error::{HistoryError, HistoryResult};
use crate::planner::ExecutionPlan;
use crate::types::{ExecutionMode, TaskType};

/// Compact record of one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub task_id: String,
    pub task_type: TaskType,
    pub execution_mode: ExecutionMode,
    pub confidence: f64,
    pub agent_count: usize,
    pub estimated_calls: u32,
    pub estimated_time_ms: u64,
    pub created_at: DateTime<Utc>,
}

impl PlanSummary {
    pub fn from_plan(plan: &ExecutionPlan, confidence: f64) -> Self {
        Self {
            task_id: plan.task_id.clone(),
            task_type: plan.task_type,
            execution_mode: plan.execution_mode,
            confidence,
            agent_count: plan.agents.len(),
            estimated_calls: plan.estimated_calls,
            estimated_time_ms: plan.estimated_time_ms,
            created_at: Utc::now(),
        }
    }
}

/// Append-only plan log, safe to share across threads.
#[derive(Debug, Default)]
pub struct ExecutionHistory {
    entries: Mutex<Vec<PlanSummary>>,
    file: Option<PathBuf>,
}

impl ExecutionHistory {
    /// In-memory history.
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory history mirrored to an append-only JSONL file.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            file: Some(path.into()),
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Append a summary. The in-memory append always happens; an error only
    /// reports that the file copy could not be written.
    pub fn append(&self, summary: PlanSummary) -> HistoryResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        // Written under the lock so the file keeps the in-memory order.
        let written = match &self.file {
            Some(path) => append_line(path, &summary),
            None => Ok(()),
        };
        debug!(task_id = %summary.task_id, total = entries.len() + 1, "Recorded plan");
        entries.push(summary);
        written
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every entry, oldest first.
    pub fn snapshot(&self) -> Vec<PlanSummary> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<PlanSummary> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let start = entries.len().saturating_sub(n);
        entries[start..].to_vec()
    }

    /// Task types of the last `n` entries, oldest first.
    pub fn recent_task_types(&self, n: usize) -> Vec<TaskType> {
        self.recent(n).into_iter().map(|s| s.task_type).collect()
    }

    pub fn stats(&self) -> HistoryStats {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        HistoryStats::from_summaries(&entries)
    }

    /// Read a JSONL history file. Blank lines are skipped.
    pub fn load_jsonl(path: impl AsRef<Path>) -> HistoryResult<Vec<PlanSummary>> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| HistoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut out = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| HistoryError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            out.push(serde_json::from_str(&line)?);
        }
        Ok(out)
    }
}

fn append_line(path: &Path, summary: &PlanSummary) -> HistoryResult<()> {
    let line = serde_json::to_string(summary)?;
    let io_err = |source| HistoryError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    writeln!(file, "{}", line).map_err(io_err)
}

/// Aggregate counts over a history.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub total_plans: usize,
    pub by_task_type: BTreeMap<TaskType, usize>,
    pub by_mode: BTreeMap<ExecutionMode, usize>,
    pub low_confidence: usize,
    pub estimated_calls: u64,
    pub estimated_time_ms: u64,
}

impl HistoryStats {
    pub fn from_summaries(summaries: &[PlanSummary]) -> Self {
        let mut stats = Self::default();
        for s in summaries {
            stats.total_plans += 1;
            *stats.by_task_type.entry(s.task_type).or_insert(0) += 1;
            *stats.by_mode.entry(s.execution_mode).or_insert(0) += 1;
            if s.confidence == 0.0 {
                stats.low_confidence += 1;
            }
            stats.estimated_calls += u64::from(s.estimated_calls);
            stats.estimated_time_ms += s.estimated_time_ms;
        }
        stats
    }
}
