//! Consol Store: intermediate step persistence
//!
//! Every stage of an analysis session writes its result here under a step
//! name and category; consolidation reads them back.

pub mod error;
pub mod fs;
pub mod memory;

use std::collections::BTreeSet;
use std::path::PathBuf;

use consol_core::{intermediate_location, SessionId, StepFile, StepRecord};
use serde_json::Value;

pub use error::StoreError;
pub use fs::FsStepStore;
pub use memory::MemoryStepStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Session-scoped store of immutable step records.
pub trait StepStore: Send + Sync {
    /// Persist one record. Returns where it landed.
    fn put(&self, record: &StepRecord) -> Result<PathBuf>;

    /// Names of every step recorded for the session (any status).
    fn list_steps(&self, session: &SessionId) -> Result<BTreeSet<String>>;

    /// Latest record written under `name`, if any.
    fn load_step(&self, name: &str, session: &SessionId) -> Result<Option<StepRecord>>;

    /// Raw file listing of the session.
    fn list_files(&self, session: &SessionId) -> Result<Vec<StepFile>>;

    /// Location a human can open to inspect the session's files.
    fn session_location(&self, session: &SessionId) -> String {
        intermediate_location(session)
    }

    fn save_step(
        &self,
        name: &str,
        data: Value,
        category: &str,
        session: &SessionId,
    ) -> Result<PathBuf> {
        self.put(&StepRecord::success(name, category, session.clone(), data))
    }

    fn save_error(&self, name: &str, error: &str, session: &SessionId) -> Result<PathBuf> {
        self.put(&StepRecord::error(name, session.clone(), error))
    }
}

/// Reject names that could not be used as a single path segment.
pub(crate) fn validate_segment(kind: &str, value: &str) -> Result<()> {
    let bad = value.trim().is_empty()
        || value == "."
        || value.contains("..")
        || value.chars().any(|c| c == '/' || c == '\\' || c.is_control());
    if bad {
        return Err(StoreError::InvalidName(format!("{} '{}'", kind, value)));
    }
    Ok(())
}
