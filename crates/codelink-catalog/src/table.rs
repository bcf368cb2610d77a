//! In-memory catalog table with a unique-by-code index.

use std::collections::HashMap;

use codelink_model::CodeRecord;

/// One loaded code table.
///
/// Preserves load order (lookups during a scan are stable) and keeps a
/// unique index on `code`. When the input contains the same code twice,
/// the first occurrence wins and later rows are dropped.
#[derive(Debug, Clone, Default)]
pub struct CatalogTable {
    records: Vec<CodeRecord>,
    index: HashMap<String, usize>,
}

impl CatalogTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CodeRecord>,
    {
        let mut table = Self::new();
        for record in records {
            let key = record.code.trim().to_string();
            if key.is_empty() || table.index.contains_key(&key) {
                continue;
            }
            table.index.insert(key, table.records.len());
            table.records.push(record);
        }
        table
    }

    /// Exact lookup by code. Codes are matched as-is apart from trimming;
    /// classification codes like `TM2.E01.1` are case-significant.
    pub fn find(&self, code: &str) -> Option<&CodeRecord> {
        self.index.get(code.trim()).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[CodeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
