//! Filesystem step store backend.
//!
//! Layout: `{root}/{session_id}/{category}/{name}_{unix_millis}.json`.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use consol_core::{SessionId, StepFile, StepRecord};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{validate_segment, Result, StepStore};

const RECORD_EXT: &str = "json";

pub struct FsStepStore {
    root: PathBuf,
}

/// A record file found while walking a session directory.
struct Entry {
    path: PathBuf,
    name: String,
    millis: i64,
}

impl FsStepStore {
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn session_dir(&self, session: &SessionId) -> Result<PathBuf> {
        session.validate()?;
        Ok(self.root.join(session.as_str()))
    }

    /// Split `{name}_{millis}` back into its parts.
    fn parse_stem(stem: &str) -> Option<(String, i64)> {
        let (name, millis) = stem.rsplit_once('_')?;
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), millis.parse().ok()?))
    }

    /// Record files of a session, `{category}/{file}` depth only.
    fn entries(&self, session: &SessionId) -> Result<Vec<Entry>> {
        let dir = self.session_dir(session)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(2).max_depth(2).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT)
            {
                continue;
            }
            let parsed = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(Self::parse_stem);
            match parsed {
                Some((name, millis)) => entries.push(Entry {
                    path: path.to_path_buf(),
                    name,
                    millis,
                }),
                None => debug!(path = %path.display(), "ignoring file outside the record layout"),
            }
        }
        Ok(entries)
    }

    fn read_record(path: &Path) -> Option<StepRecord> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable step file skipped");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed step file skipped");
                None
            }
        }
    }
}

impl StepStore for FsStepStore {
    fn put(&self, record: &StepRecord) -> Result<PathBuf> {
        validate_segment("step name", &record.name)?;
        validate_segment("category", &record.category)?;

        let dir = self.session_dir(&record.session_id)?.join(&record.category);
        fs::create_dir_all(&dir)?;

        // Two writes in the same millisecond must not overwrite each other.
        let mut millis = record.timestamp.timestamp_millis();
        let mut path = dir.join(format!("{}_{}.{}", record.name, millis, RECORD_EXT));
        while path.exists() {
            millis += 1;
            path = dir.join(format!("{}_{}.{}", record.name, millis, RECORD_EXT));
        }

        let tmp = path.with_extension("tmp");
        {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(&serde_json::to_vec_pretty(record)?)?;
            f.sync_all()?;
        }
        fs::rename(&tmp, &path)?;

        debug!(step = %record.name, path = %path.display(), "step saved");
        Ok(path)
    }

    fn list_steps(&self, session: &SessionId) -> Result<BTreeSet<String>> {
        Ok(self.entries(session)?.into_iter().map(|e| e.name).collect())
    }

    fn load_step(&self, name: &str, session: &SessionId) -> Result<Option<StepRecord>> {
        let mut candidates: Vec<Entry> = self
            .entries(session)?
            .into_iter()
            .filter(|e| e.name == name)
            .collect();
        candidates.sort_by(|a, b| b.millis.cmp(&a.millis).then_with(|| b.path.cmp(&a.path)));

        let Some(newest) = candidates.first() else {
            return Ok(None);
        };
        if let Some(record) = Self::read_record(&newest.path) {
            return Ok(Some(record));
        }

        // An older record would be stale: report the step as failed instead.
        warn!(
            step = name,
            session = %session,
            path = %newest.path.display(),
            older = candidates.len() - 1,
            "newest step record unreadable, step treated as failed"
        );
        let mut failed = StepRecord::error(
            name,
            session.clone(),
            format!("registro mais recente ilegível: {}", newest.path.display()),
        );
        if let Some(at) = DateTime::<Utc>::from_timestamp_millis(newest.millis) {
            failed.timestamp = at;
        }
        Ok(Some(failed))
    }

    fn list_files(&self, session: &SessionId) -> Result<Vec<StepFile>> {
        let mut files = Vec::new();
        for entry in self.entries(session)? {
            let meta = match fs::metadata(&entry.path) {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(
                        path = %entry.path.display(),
                        error = %e,
                        "step file vanished during listing"
                    );
                    continue;
                }
            };
            let category = entry
                .path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let name = entry
                .path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let modified = meta
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            files.push(StepFile {
                name,
                path: entry.path,
                size: meta.len(),
                category,
                modified,
            });
        }
        Ok(files)
    }
}
