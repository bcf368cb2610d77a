//! The two-catalog reader with swappable tables and JSON persistence.
//!
//! `CodeCatalogs` owns the source and target tables behind `RwLock`s.
//! Tables are only mutated by whole-table replace; readers racing a
//! replace observe either the old or the new table, which is acceptable
//! for the seed/re-import path.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use codelink_model::{CatalogId, CodeRecord};
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::table::CatalogTable;

/// Maximum rows returned by [`CodeCatalogs::search`].
pub const SEARCH_LIMIT: usize = 10;

/// Read seam over the two code tables.
///
/// The resolution engine is generic over this trait so it can be tested
/// against stub catalogs without touching the filesystem.
pub trait CatalogReader {
    /// Exact lookup in the named catalog. `None` means the code is absent.
    fn find_by_code(&self, catalog: CatalogId, code: &str) -> Option<CodeRecord>;

    /// All rows of the named catalog, in load order.
    fn list_all(&self, catalog: CatalogId) -> Vec<CodeRecord>;
}

/// Owner of the source and target code tables.
pub struct CodeCatalogs {
    source: RwLock<CatalogTable>,
    target: RwLock<CatalogTable>,
    dir: Option<PathBuf>,
}

impl CodeCatalogs {
    /// Catalogs without backing files; tables start empty.
    pub fn in_memory() -> Self {
        Self {
            source: RwLock::new(CatalogTable::new()),
            target: RwLock::new(CatalogTable::new()),
            dir: None,
        }
    }

    /// Open catalogs backed by JSON files in `dir`, loading any tables
    /// already present. The directory is created if missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| CatalogError::io("create directory", &dir, e))?;

        let source = load_table(&table_path(&dir, CatalogId::Source))?;
        let target = load_table(&table_path(&dir, CatalogId::Target))?;
        debug!(
            source = source.len(),
            target = target.len(),
            "opened code catalogs"
        );

        Ok(Self {
            source: RwLock::new(source),
            target: RwLock::new(target),
            dir: Some(dir),
        })
    }

    /// Replace the named table wholesale and persist it when backed by a
    /// directory. Returns the number of rows stored (after dedup).
    pub fn replace(
        &self,
        catalog: CatalogId,
        records: Vec<CodeRecord>,
    ) -> Result<usize, CatalogError> {
        let table = CatalogTable::from_records(records);
        let count = table.len();

        if let Some(dir) = &self.dir {
            write_table_atomic(&table_path(dir, catalog), table.records())?;
        }

        *self
            .lock_for(catalog)
            .write()
            .unwrap_or_else(PoisonError::into_inner) = table;
        info!(catalog = %catalog, rows = count, "replaced catalog table");
        Ok(count)
    }

    /// Case-insensitive substring search over code and display, capped at
    /// [`SEARCH_LIMIT`] rows. This is the plain lookup surface, not the
    /// fuzzy resolver.
    pub fn search(&self, catalog: CatalogId, query: &str) -> Vec<CodeRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let table = self
            .lock_for(catalog)
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        table
            .records()
            .iter()
            .filter(|r| {
                r.code.to_lowercase().contains(&needle)
                    || r.display.to_lowercase().contains(&needle)
            })
            .take(SEARCH_LIMIT)
            .cloned()
            .collect()
    }

    /// Row count of the named table.
    pub fn count(&self, catalog: CatalogId) -> usize {
        self.lock_for(catalog)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn lock_for(&self, catalog: CatalogId) -> &RwLock<CatalogTable> {
        match catalog {
            CatalogId::Source => &self.source,
            CatalogId::Target => &self.target,
        }
    }
}

impl CatalogReader for CodeCatalogs {
    fn find_by_code(&self, catalog: CatalogId, code: &str) -> Option<CodeRecord> {
        self.lock_for(catalog)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find(code)
            .cloned()
    }

    fn list_all(&self, catalog: CatalogId) -> Vec<CodeRecord> {
        self.lock_for(catalog)
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records()
            .to_vec()
    }
}

fn table_path(dir: &Path, catalog: CatalogId) -> PathBuf {
    match catalog {
        CatalogId::Source => dir.join("source_codes.json"),
        CatalogId::Target => dir.join("target_codes.json"),
    }
}

fn load_table(path: &Path) -> Result<CatalogTable, CatalogError> {
    if !path.exists() {
        return Ok(CatalogTable::new());
    }
    let contents =
        fs::read_to_string(path).map_err(|e| CatalogError::io("read", path, e))?;
    let records: Vec<CodeRecord> =
        serde_json::from_str(&contents).map_err(|e| CatalogError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(CatalogTable::from_records(records))
}

/// Write a table to disk via temp file + rename so a crash mid-write
/// never leaves a torn catalog file behind.
fn write_table_atomic(path: &Path, records: &[CodeRecord]) -> Result<(), CatalogError> {
    let json = serde_json::to_vec_pretty(records).map_err(|e| CatalogError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;

    let temp_path = path.with_extension("json.tmp");
    let mut file =
        File::create(&temp_path).map_err(|e| CatalogError::io("create", &temp_path, e))?;
    file.write_all(&json)
        .map_err(|e| CatalogError::io("write", &temp_path, e))?;
    file.sync_all()
        .map_err(|e| CatalogError::io("sync", &temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| CatalogError::io("rename", &temp_path, e))?;
    Ok(())
}
