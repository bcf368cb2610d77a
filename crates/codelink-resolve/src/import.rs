//! Replace-all bulk importer for seed/demo mapping data.
//!
//! Invoked out of band from resolution. Validation runs over the whole
//! batch before any mutation; from the caller's point of view the replace
//! is all-or-nothing.

use std::collections::BTreeMap;

use codelink_model::Mapping;
use tracing::info;

use crate::error::ImportError;
use crate::store::MappingStore;

/// Validate a batch and atomically replace the entire mapping collection.
///
/// Returns the number of records imported. A malformed record, an empty
/// batch, or a duplicated source code aborts before mutation and leaves
/// the prior collection fully intact.
pub fn import_all(store: &MappingStore, records: Vec<Mapping>) -> Result<usize, ImportError> {
    if records.is_empty() {
        return Err(ImportError::EmptyBatch);
    }

    let mut validated: BTreeMap<String, Mapping> = BTreeMap::new();
    for (index, record) in records.into_iter().enumerate() {
        check_field(index, "sourceCode", &record.source_code)?;
        check_field(index, "targetCode", &record.target_code)?;
        check_field(index, "targetDisplay", &record.target_display)?;

        let key = record.source_code.clone();
        if validated.insert(key.clone(), record).is_some() {
            return Err(ImportError::DuplicateSource { code: key });
        }
    }

    let count = store.replace_all(validated)?;
    info!(count, "imported mapping batch");
    Ok(count)
}

fn check_field(index: usize, name: &'static str, value: &str) -> Result<(), ImportError> {
    if value.trim().is_empty() {
        return Err(ImportError::InvalidRecord {
            index,
            reason: format!("{name} must not be blank"),
        });
    }
    Ok(())
}
