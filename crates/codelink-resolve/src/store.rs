//! Persisted mapping cache keyed by source code.
//!
//! The store owns the one mutable entity in the system. A single interior
//! mutex guards both the index and the persist step, which is what makes
//! `insert_if_absent` atomic with respect to concurrent callers: two
//! simultaneous resolutions for the same code cannot both create a record,
//! and the loser reads the winner's row back.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use codelink_model::Mapping;
use tracing::{debug, info};

use crate::error::StoreError;

/// Result of an insert attempt.
#[derive(Debug, Clone)]
pub struct InsertOutcome {
    /// The authoritative record for the source code after the call.
    pub mapping: Mapping,
    /// True when this call created the record; false when a mapping
    /// already existed and was returned unchanged.
    pub created: bool,
}

/// Mapping cache with idempotent insert-if-absent semantics.
pub struct MappingStore {
    inner: Mutex<BTreeMap<String, Mapping>>,
    path: Option<PathBuf>,
}

impl MappingStore {
    /// Store without a backing file. Used for tests and dry runs.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(BTreeMap::new()),
            path: None,
        }
    }

    /// Open a store backed by `mappings.json` in `dir`, loading any
    /// existing records. The directory is created if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::io("create directory", &dir, e))?;
        let path = dir.join("mappings.json");

        let mut index = BTreeMap::new();
        if path.exists() {
            let contents =
                fs::read_to_string(&path).map_err(|e| StoreError::io("read", &path, e))?;
            let records: Vec<Mapping> =
                serde_json::from_str(&contents).map_err(|e| StoreError::Json {
                    path: path.clone(),
                    source: e,
                })?;
            for mapping in records {
                index.entry(mapping.source_code.clone()).or_insert(mapping);
            }
        }
        debug!(path = %path.display(), count = index.len(), "opened mapping store");

        Ok(Self {
            inner: Mutex::new(index),
            path: Some(path),
        })
    }

    /// Cached mapping for a source code, if one exists.
    pub fn get(&self, source_code: &str) -> Result<Option<Mapping>, StoreError> {
        Ok(self.lock().get(source_code.trim()).cloned())
    }

    /// Insert a mapping unless one already exists for its source code.
    ///
    /// On conflict the existing record is returned unchanged with
    /// `created = false`; duplicate-insert races are not errors. If the
    /// persist step fails the in-memory insert is rolled back so memory
    /// and disk stay consistent.
    pub fn insert_if_absent(&self, mapping: Mapping) -> Result<InsertOutcome, StoreError> {
        let mut guard = self.lock();
        if let Some(existing) = guard.get(&mapping.source_code) {
            return Ok(InsertOutcome {
                mapping: existing.clone(),
                created: false,
            });
        }

        guard.insert(mapping.source_code.clone(), mapping.clone());
        if let Err(error) = self.persist(&guard) {
            guard.remove(&mapping.source_code);
            return Err(error);
        }
        Ok(InsertOutcome {
            mapping,
            created: true,
        })
    }

    /// Operator-supplied mapping, bypassing similarity resolution.
    ///
    /// All three fields must be non-blank; the same duplicate-avoidance
    /// rule as [`Self::insert_if_absent`] applies.
    pub fn manual_add(
        &self,
        source_code: &str,
        target_code: &str,
        target_display: &str,
    ) -> Result<InsertOutcome, StoreError> {
        let source_code = non_blank(source_code, "sourceCode")?;
        let target_code = non_blank(target_code, "targetCode")?;
        let target_display = non_blank(target_display, "targetDisplay")?;
        self.insert_if_absent(Mapping::new(source_code, target_code, target_display))
    }

    /// All mappings, in source-code order.
    pub fn list_all(&self) -> Result<Vec<Mapping>, StoreError> {
        Ok(self.lock().values().cloned().collect())
    }

    /// Number of cached mappings.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    /// Remove every mapping. Only the bulk importer's replace-all path
    /// uses this.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.replace_all(BTreeMap::new())?;
        Ok(())
    }

    /// Swap the entire collection in one step. The previous table is
    /// restored if the persist step fails, so callers observe either the
    /// old collection or the new one, never a partial replace.
    pub(crate) fn replace_all(
        &self,
        mappings: BTreeMap<String, Mapping>,
    ) -> Result<usize, StoreError> {
        let mut guard = self.lock();
        let previous = std::mem::replace(&mut *guard, mappings);
        if let Err(error) = self.persist(&guard) {
            *guard = previous;
            return Err(error);
        }
        info!(count = guard.len(), "replaced mapping collection");
        Ok(guard.len())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Mapping>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, index: &BTreeMap<String, Mapping>) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let records: Vec<&Mapping> = index.values().collect();
        write_json_atomic(path, &records)
    }
}

fn non_blank<'a>(value: &'a str, field: &'static str) -> Result<&'a str, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidField { field });
    }
    Ok(trimmed)
}

/// Temp file + rename so a crash mid-write never tears the mapping file.
fn write_json_atomic(path: &Path, records: &[&Mapping]) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(records).map_err(|e| StoreError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    let temp_path = path.with_extension("json.tmp");
    let mut file =
        File::create(&temp_path).map_err(|e| StoreError::io("create", &temp_path, e))?;
    file.write_all(&json)
        .map_err(|e| StoreError::io("write", &temp_path, e))?;
    file.sync_all()
        .map_err(|e| StoreError::io("sync", &temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| StoreError::io("rename", &temp_path, e))?;
    Ok(())
}
