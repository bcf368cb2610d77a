//! The persisted mapping entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The authoritative link from one source code to one target code.
///
/// At most one mapping exists per `source_code`; that uniqueness holds
/// even under concurrent resolution attempts for the same code. A mapping
/// is immutable once created — there is no update operation — and is only
/// removed by the bulk importer's replace-all reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    /// Source terminology code (unique key).
    pub source_code: String,
    /// Best-matching target classification code.
    pub target_code: String,
    /// Display text of the target code at resolution time.
    pub target_display: String,
    /// When this mapping was first resolved or manually added. Stamped on
    /// creation when absent from imported records.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Mapping {
    /// Create a mapping stamped with the current time.
    pub fn new(
        source_code: impl Into<String>,
        target_code: impl Into<String>,
        target_display: impl Into<String>,
    ) -> Self {
        Self {
            source_code: source_code.into(),
            target_code: target_code.into(),
            target_display: target_display.into(),
            created_at: Utc::now(),
        }
    }
}
