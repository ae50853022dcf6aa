//! In-memory step store backend.
//!
//! Used by tests and by callers that do not need durability. Supports fault
//! injection so the consolidation fallback paths can be exercised.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use consol_core::{SessionId, StepFile, StepRecord};
use parking_lot::RwLock;

use crate::{validate_segment, Result, StepStore, StoreError};

#[derive(Default)]
pub struct MemoryStepStore {
    records: RwLock<BTreeMap<SessionId, Vec<StepRecord>>>,
    fail_listing: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStepStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `list_steps` and `list_files` fail.
    pub fn fail_listing(&self, fail: bool) {
        self.fail_listing.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Every record written for a session, in write order.
    pub fn records(&self, session: &SessionId) -> Vec<StepRecord> {
        self.records.read().get(session).cloned().unwrap_or_default()
    }

    fn check_listing(&self) -> Result<()> {
        if self.fail_listing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("listing disabled".to_string()));
        }
        Ok(())
    }

    fn virtual_path(record: &StepRecord) -> PathBuf {
        PathBuf::from(format!(
            "{}/{}/{}_{}.json",
            record.session_id,
            record.category,
            record.name,
            record.timestamp.timestamp_millis()
        ))
    }
}

impl StepStore for MemoryStepStore {
    fn put(&self, record: &StepRecord) -> Result<PathBuf> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        record.session_id.validate()?;
        validate_segment("step name", &record.name)?;
        validate_segment("category", &record.category)?;

        self.records
            .write()
            .entry(record.session_id.clone())
            .or_default()
            .push(record.clone());
        Ok(Self::virtual_path(record))
    }

    fn list_steps(&self, session: &SessionId) -> Result<BTreeSet<String>> {
        self.check_listing()?;
        Ok(self
            .records
            .read()
            .get(session)
            .map(|records| records.iter().map(|r| r.name.clone()).collect())
            .unwrap_or_default())
    }

    fn load_step(&self, name: &str, session: &SessionId) -> Result<Option<StepRecord>> {
        let guard = self.records.read();
        let Some(records) = guard.get(session) else {
            return Ok(None);
        };
        // Later writes win ties on timestamp.
        Ok(records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.name == name)
            .max_by_key(|(idx, r)| (r.timestamp, *idx))
            .map(|(_, r)| r.clone()))
    }

    fn list_files(&self, session: &SessionId) -> Result<Vec<StepFile>> {
        self.check_listing()?;
        let guard = self.records.read();
        let Some(records) = guard.get(session) else {
            return Ok(Vec::new());
        };
        let mut files = Vec::with_capacity(records.len());
        for record in records {
            let path = Self::virtual_path(record);
            files.push(StepFile {
                name: path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string(),
                size: serde_json::to_vec(record)?.len() as u64,
                category: record.category.clone(),
                modified: record.timestamp,
                path,
            });
        }
        Ok(files)
    }
}
