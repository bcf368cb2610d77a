//! Mapping resolution workflow.
//!
//! Each request walks CacheCheck → CatalogFetch → Resolve → Persist →
//! Done, with `NotFound` and `NoMatch` as the terminal failure states.
//! Cache entries never expire; a hit returns the stored record unchanged.

use std::sync::Arc;

use codelink_catalog::CatalogReader;
use codelink_model::{CatalogId, CodeRecord, Mapping};
use tracing::{debug, info};

use crate::error::ResolveError;
use crate::score::best_match;
use crate::store::MappingStore;

/// Minimum similarity a candidate must exceed to qualify.
///
/// The comparison is strict: a score of exactly 0.6 is rejected. This
/// constant is part of the public contract.
pub const MATCH_THRESHOLD: f64 = 0.6;

/// Orchestrates cache lookup, catalog fetch, similarity resolution, and
/// persistence. This is the unit callers invoke.
pub struct ResolutionEngine<C> {
    catalogs: C,
    store: Arc<MappingStore>,
}

impl<C: CatalogReader> ResolutionEngine<C> {
    pub fn new(catalogs: C, store: Arc<MappingStore>) -> Self {
        Self { catalogs, store }
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Resolve a source code to its authoritative mapping.
    ///
    /// Whichever record `insert_if_absent` returns — freshly created or
    /// concurrently created by a racing caller — is the result, never the
    /// locally computed one; that preserves the one-mapping-per-source
    /// invariant under races.
    pub fn resolve(&self, source_code: &str) -> Result<Mapping, ResolveError> {
        let code = source_code.trim();
        if code.is_empty() {
            return Err(ResolveError::Validation(
                "source code must not be blank".to_string(),
            ));
        }

        if let Some(cached) = self.store.get(code)? {
            debug!(code, "resolution served from mapping cache");
            return Ok(cached);
        }

        let source = self
            .catalogs
            .find_by_code(CatalogId::Source, code)
            .filter(CodeRecord::has_display)
            .ok_or_else(|| ResolveError::NotFound(code.to_string()))?;

        let candidates = self.catalogs.list_all(CatalogId::Target);
        let displays: Vec<&str> = candidates.iter().map(|r| r.display.as_str()).collect();
        let Some(best) = best_match(&source.display, &displays) else {
            return Err(ResolveError::NoMatch(code.to_string()));
        };
        if best.score <= MATCH_THRESHOLD {
            debug!(code, score = best.score, "best candidate below threshold");
            return Err(ResolveError::NoMatch(code.to_string()));
        }

        let target = &candidates[best.index];
        let outcome = self.store.insert_if_absent(Mapping::new(
            code,
            target.code.as_str(),
            target.display.as_str(),
        ))?;
        if outcome.created {
            info!(
                code,
                target = %outcome.mapping.target_code,
                score = best.score,
                "new mapping resolved"
            );
        } else {
            debug!(code, "lost insert race; returning existing mapping");
        }
        Ok(outcome.mapping)
    }
}
