use crate::leave::api::{ApiError, CreateLeaveRequest, CreatedLeave, LeaveApi};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

pub const LEDGER_FILE: &str = "leave_ledger.jsonl";

/// One line of the ledger.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerEntry {
    Create {
        id: String,
        at: NaiveDateTime,
        request: CreateLeaveRequest,
    },
    Update {
        id: String,
        at: NaiveDateTime,
        request: CreateLeaveRequest,
    },
    Delete {
        id: String,
        at: NaiveDateTime,
    },
}

/// Agency API backed by an append-only JSON-lines journal in the data directory.
pub struct LedgerApi {
    path: PathBuf,
    // Serializes appends from the UI thread and submit workers.
    lock: Mutex<()>,
}

impl LedgerApi {
    pub fn new(dir: &Path) -> Self {
        LedgerApi {
            path: dir.join(LEDGER_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &LedgerEntry) -> Result<(), ApiError> {
        let line = serde_json::to_string(entry)?;
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ApiError::Rejected("ledger lock poisoned".to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;
        debug!(path = %self.path.display(), "ledger entry appended");
        Ok(())
    }

    /// Reads every entry back; blank lines are skipped.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>, ApiError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        raw.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).map_err(ApiError::from))
            .collect()
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl LeaveApi for LedgerApi {
    fn create_leave_event(&self, request: &CreateLeaveRequest) -> Result<CreatedLeave, ApiError> {
        if request.user_id.trim().is_empty() {
            return Err(ApiError::Rejected("userId is required".to_string()));
        }
        let id = format!("evt-{}", uuid::Uuid::new_v4());
        self.append(&LedgerEntry::Create {
            id: id.clone(),
            at: now(),
            request: request.clone(),
        })?;
        info!(%id, user = %request.user_id, kind = %request.event_type, "leave event created");
        Ok(CreatedLeave { id })
    }

    fn update_leave_event(&self, id: &str, request: &CreateLeaveRequest) -> Result<(), ApiError> {
        self.append(&LedgerEntry::Update {
            id: id.to_string(),
            at: now(),
            request: request.clone(),
        })?;
        info!(%id, "leave event updated");
        Ok(())
    }

    fn delete_leave_event(&self, id: &str) -> Result<(), ApiError> {
        self.append(&LedgerEntry::Delete {
            id: id.to_string(),
            at: now(),
        })?;
        info!(%id, "leave event deleted");
        Ok(())
    }
}
