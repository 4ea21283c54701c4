//! The asset pool: three JSON-file collections owned by one writer.
//!
//! Each collection (`ideas.json`, `executions.json`, `revenue.json`) is
//! loaded eagerly by [`AssetPool::open`] and rewritten in full after every
//! mutation that touches it, via a temp file and a rename. A missing or
//! unreadable file never stops the pool from opening; the collection starts
//! empty and the reason is kept in [`LoadReport`].

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clock::{format_timestamp, id_stamp, Clock, SystemClock};
use crate::error::StoreError;
use crate::record::{
    ExecutionRecord, ExecutionStatus, IdeaRecord, IdeaStatus, LogEntry, NewIdea, RevenueRecord,
    StepEntry,
};
use crate::stats::{ExecutionCounts, IdeaCounts, Overview, RevenueStats};

pub const IDEAS_FILE: &str = "ideas.json";
pub const EXECUTIONS_FILE: &str = "executions.json";
pub const REVENUE_FILE: &str = "revenue.json";

/// Default `limit` for [`AssetPool::list_ideas`].
pub const DEFAULT_LIST_LIMIT: usize = 10;

// ──────────────────────────────────────────────
// Load status
// ──────────────────────────────────────────────

/// How a collection came to be in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Parsed from its file.
    Loaded,
    /// No file yet; started empty.
    Missing,
    /// The file could not be read or parsed; started empty.
    Defaulted(String),
}

impl LoadStatus {
    pub fn is_defaulted(&self) -> bool {
        matches!(self, LoadStatus::Defaulted(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub ideas: LoadStatus,
    pub executions: LoadStatus,
    pub revenue: LoadStatus,
}

fn load_collection<T: DeserializeOwned>(path: &Path) -> (Vec<T>, LoadStatus) {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no collection file; starting empty");
            return (Vec::new(), LoadStatus::Missing);
        }
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to read collection; starting empty",
            );
            return (Vec::new(), LoadStatus::Defaulted(error.to_string()));
        }
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(records) => (records, LoadStatus::Loaded),
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to parse collection; starting empty",
            );
            (Vec::new(), LoadStatus::Defaulted(error.to_string()))
        }
    }
}

fn persist_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    let io_error = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }

    let payload = serde_json::to_string_pretty(records).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, payload).map_err(io_error)?;
    fs::rename(&temp_path, path).map_err(io_error)?;

    tracing::debug!(path = %path.display(), records = records.len(), "collection written");
    Ok(())
}

/// `<prefix>-<stamp>`, or `<prefix>-<stamp>-N` with the smallest N ≥ 2 that
/// is not taken yet.
fn unique_id(prefix: &str, stamp: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("{}-{}", prefix, stamp);
    if !taken(&base) {
        return base;
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// ──────────────────────────────────────────────
// AssetPool
// ──────────────────────────────────────────────

/// Idea, execution and revenue records backed by JSON files in one
/// directory.
///
/// Mutations apply to memory first and are then written to disk. When the
/// write fails the error is returned and the in-memory change stays, so a
/// later [`AssetPool::flush`] can retry.
pub struct AssetPool {
    dir: PathBuf,
    clock: Box<dyn Clock>,
    ideas: Vec<IdeaRecord>,
    executions: Vec<ExecutionRecord>,
    revenue: Vec<RevenueRecord>,
    load_report: LoadReport,
}

impl AssetPool {
    /// Open the pool in `dir`, loading all three collections.
    ///
    /// The directory is only created on the first write.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::open_with_clock(dir, Box::new(SystemClock))
    }

    pub fn open_with_clock(dir: impl Into<PathBuf>, clock: Box<dyn Clock>) -> Self {
        let dir = dir.into();
        let (ideas, ideas_status) = load_collection(&dir.join(IDEAS_FILE));
        let (executions, executions_status) = load_collection(&dir.join(EXECUTIONS_FILE));
        let (revenue, revenue_status) = load_collection(&dir.join(REVENUE_FILE));

        tracing::debug!(
            dir = %dir.display(),
            ideas = ideas.len(),
            executions = executions.len(),
            revenue = revenue.len(),
            "asset pool opened",
        );

        AssetPool {
            dir,
            clock,
            ideas,
            executions,
            revenue,
            load_report: LoadReport {
                ideas: ideas_status,
                executions: executions_status,
                revenue: revenue_status,
            },
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Rewrite all three files from memory.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.save_ideas()?;
        self.save_executions()?;
        self.save_revenue()
    }

    fn save_ideas(&self) -> Result<(), StoreError> {
        persist_collection(&self.dir.join(IDEAS_FILE), &self.ideas)
    }

    fn save_executions(&self) -> Result<(), StoreError> {
        persist_collection(&self.dir.join(EXECUTIONS_FILE), &self.executions)
    }

    fn save_revenue(&self) -> Result<(), StoreError> {
        persist_collection(&self.dir.join(REVENUE_FILE), &self.revenue)
    }

    // ── Ideas ──────────────────────────────────

    /// Store a new idea as `pending` with score 0 and return its id.
    pub fn add_idea(&mut self, idea: NewIdea) -> Result<String, StoreError> {
        let now = self.clock.now();
        let id = unique_id("idea", &id_stamp(now), |candidate| {
            self.ideas.iter().any(|r| r.id == candidate)
        });

        self.ideas.push(IdeaRecord {
            id: id.clone(),
            name: idea.name,
            description: idea.description,
            idea_type: idea.idea_type,
            tags: idea.tags,
            status: IdeaStatus::Pending,
            score: 0.0,
            created_at: format_timestamp(now),
            updated_at: None,
            notes: None,
            extra: idea.extra,
        });
        self.save_ideas()?;

        tracing::info!(id = %id, "idea added");
        Ok(id)
    }

    pub fn get_idea(&self, id: &str) -> Option<&IdeaRecord> {
        self.ideas.iter().find(|r| r.id == id)
    }

    /// Ideas with the given status (or all), newest first, at most `limit`.
    pub fn list_ideas(&self, status: Option<IdeaStatus>, limit: usize) -> Vec<IdeaRecord> {
        let mut ideas: Vec<IdeaRecord> = self
            .ideas
            .iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        ideas.truncate(limit);
        ideas
    }

    /// Set an idea's status, stamping `updated_at`. `notes` replaces the
    /// existing notes when given. Returns `false` for an unknown id.
    pub fn update_idea_status(
        &mut self,
        id: &str,
        status: IdeaStatus,
        notes: Option<&str>,
    ) -> Result<bool, StoreError> {
        let now = format_timestamp(self.clock.now());
        let Some(record) = self.ideas.iter_mut().find(|r| r.id == id) else {
            return Ok(false);
        };

        record.status = status;
        record.updated_at = Some(now);
        if let Some(notes) = notes {
            record.notes = Some(notes.to_string());
        }
        self.save_ideas()?;

        tracing::info!(id, status = %status, "idea status updated");
        Ok(true)
    }

    // ── Executions ─────────────────────────────

    /// Open an execution for `idea_id` and move that idea to `in_progress`.
    ///
    /// The idea id is not checked; an unknown id still gets an execution.
    pub fn start_execution(&mut self, idea_id: &str) -> Result<String, StoreError> {
        let now = self.clock.now();
        let id = unique_id("exec", &id_stamp(now), |candidate| {
            self.executions.iter().any(|r| r.id == candidate)
        });

        self.executions.push(ExecutionRecord {
            id: id.clone(),
            idea_id: idea_id.to_string(),
            started_at: format_timestamp(now),
            status: ExecutionStatus::InProgress,
            steps: Vec::new(),
            logs: Vec::new(),
            completed_at: None,
            notes: None,
        });
        self.save_executions()?;
        tracing::info!(id = %id, idea_id, "execution started");

        self.update_idea_status(idea_id, IdeaStatus::InProgress, None)?;
        Ok(id)
    }

    pub fn get_execution(&self, id: &str) -> Option<&ExecutionRecord> {
        self.executions.iter().find(|r| r.id == id)
    }

    /// Executions for one idea in start order.
    pub fn executions_for(&self, idea_id: &str) -> Vec<&ExecutionRecord> {
        self.executions
            .iter()
            .filter(|r| r.idea_id == idea_id)
            .collect()
    }

    pub fn add_execution_step(
        &mut self,
        exec_id: &str,
        step: &str,
        status: &str,
    ) -> Result<bool, StoreError> {
        let timestamp = format_timestamp(self.clock.now());
        let Some(record) = self.executions.iter_mut().find(|r| r.id == exec_id) else {
            return Ok(false);
        };
        record.steps.push(StepEntry {
            step: step.to_string(),
            status: status.to_string(),
            timestamp,
        });
        self.save_executions()?;
        Ok(true)
    }

    pub fn add_execution_log(&mut self, exec_id: &str, log: &str) -> Result<bool, StoreError> {
        let timestamp = format_timestamp(self.clock.now());
        let Some(record) = self.executions.iter_mut().find(|r| r.id == exec_id) else {
            return Ok(false);
        };
        record.logs.push(LogEntry {
            log: log.to_string(),
            timestamp,
        });
        self.save_executions()?;
        Ok(true)
    }

    /// Close an execution as `success` or `failed` and carry the outcome
    /// (and notes) over to its idea.
    ///
    /// Returns `false` for an unknown id or an execution that is already
    /// closed.
    pub fn complete_execution(
        &mut self,
        exec_id: &str,
        success: bool,
        notes: Option<&str>,
    ) -> Result<bool, StoreError> {
        let completed_at = format_timestamp(self.clock.now());
        let Some(record) = self.executions.iter_mut().find(|r| r.id == exec_id) else {
            return Ok(false);
        };
        if record.status.is_terminal() {
            tracing::debug!(exec_id, status = %record.status, "execution already closed");
            return Ok(false);
        }

        record.status = if success {
            ExecutionStatus::Success
        } else {
            ExecutionStatus::Failed
        };
        record.completed_at = Some(completed_at);
        if let Some(notes) = notes {
            record.notes = Some(notes.to_string());
        }
        let idea_id = record.idea_id.clone();
        self.save_executions()?;
        tracing::info!(exec_id, success, "execution completed");

        let idea_status = if success {
            IdeaStatus::Completed
        } else {
            IdeaStatus::Failed
        };
        self.update_idea_status(&idea_id, idea_status, notes)?;
        Ok(true)
    }

    // ── Revenue ────────────────────────────────

    /// Record income for an idea. The idea id is not checked.
    pub fn add_revenue(
        &mut self,
        idea_id: &str,
        amount: Decimal,
        source: &str,
        notes: Option<&str>,
    ) -> Result<String, StoreError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(StoreError::NegativeAmount(amount));
        }

        let now = self.clock.now();
        let id = unique_id("rev", &id_stamp(now), |candidate| {
            self.revenue.iter().any(|r| r.id == candidate)
        });

        self.revenue.push(RevenueRecord {
            id: id.clone(),
            idea_id: idea_id.to_string(),
            amount,
            source: source.to_string(),
            notes: notes.map(str::to_string),
            recorded_at: format_timestamp(now),
        });
        self.save_revenue()?;

        tracing::info!(id = %id, idea_id, amount = %amount, "revenue recorded");
        Ok(id)
    }

    pub fn revenue_records(&self) -> &[RevenueRecord] {
        &self.revenue
    }

    /// Totals over all revenue, or over one idea's revenue.
    pub fn get_revenue_stats(&self, idea_id: Option<&str>) -> RevenueStats {
        RevenueStats::from_records(
            self.revenue
                .iter()
                .filter(|r| idea_id.map_or(true, |id| r.idea_id == id)),
        )
    }

    pub fn get_overview(&self) -> Overview {
        let ideas = IdeaCounts::from_records(&self.ideas);
        Overview {
            ideas,
            success_rate: ideas.success_rate(),
            revenue: self.get_revenue_stats(None),
            executions: ExecutionCounts::from_records(&self.executions),
        }
    }
}
