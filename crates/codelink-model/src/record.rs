use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies which of the two code tables an operation targets.
///
/// Catalog identity is always an explicit parameter: a source terminology
/// code and a target classification code live in separate tables, and no
/// reader operation guesses which table a code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogId {
    /// The traditional-medicine terminology being mapped from.
    Source,
    /// The international classification being mapped to.
    Target,
}

impl CatalogId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogId::Source => "source",
            CatalogId::Target => "target",
        }
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a code catalog.
///
/// The same shape serves both tables; rows are immutable after load and a
/// table is only ever replaced wholesale by re-import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRecord {
    /// Terminology code, unique within its catalog.
    pub code: String,
    /// Human-readable display text used for similarity matching.
    pub display: String,
    /// Coding system URI or label the row belongs to.
    #[serde(default)]
    pub system: String,
}

impl CodeRecord {
    pub fn new(
        code: impl Into<String>,
        display: impl Into<String>,
        system: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
            system: system.into(),
        }
    }

    /// True when the row carries display text the resolver can score.
    ///
    /// Catalogs may contain incomplete rows; those are kept in the table
    /// but skipped at resolution time.
    pub fn has_display(&self) -> bool {
        !self.display.trim().is_empty()
    }
}
