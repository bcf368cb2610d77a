use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use codelink_catalog::{CatalogReader, CodeCatalogs};
use codelink_model::{CatalogId, CodeRecord};
use codelink_resolve::{MappingStore, ResolutionEngine, ResolveError};

/// Reader wrapper that counts catalog fetches so tests can assert the
/// cache short-circuits the second resolution.
#[derive(Clone)]
struct CountingCatalogs {
    inner: Arc<CodeCatalogs>,
    fetches: Arc<AtomicUsize>,
}

impl CountingCatalogs {
    fn new(source: Vec<CodeRecord>, target: Vec<CodeRecord>) -> Self {
        let inner = CodeCatalogs::in_memory();
        inner.replace(CatalogId::Source, source).expect("seed source");
        inner.replace(CatalogId::Target, target).expect("seed target");
        Self {
            inner: Arc::new(inner),
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl CatalogReader for CountingCatalogs {
    fn find_by_code(&self, catalog: CatalogId, code: &str) -> Option<CodeRecord> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_code(catalog, code)
    }

    fn list_all(&self, catalog: CatalogId) -> Vec<CodeRecord> {
        self.inner.list_all(catalog)
    }
}

fn namaste_source() -> Vec<CodeRecord> {
    vec![
        CodeRecord::new("NAM001", "madhumeha", "namaste"),
        CodeRecord::new("NAM002", "amlapitta", "namaste"),
        CodeRecord::new("NAM003", "zzzz", "namaste"),
        CodeRecord::new("NAM004", "   ", "namaste"),
    ]
}

/// One close match for "madhumeha" plus nine low-similarity entries.
fn tm2_targets() -> Vec<CodeRecord> {
    let mut records = vec![CodeRecord::new(
        "TM2.E01.1",
        "madhumeha disorder",
        "icd11-tm2",
    )];
    for (i, display) in [
        "Wind pattern",
        "Bile pattern",
        "Phlegm pattern",
        "Heat pattern",
        "Cold pattern",
        "Dryness pattern",
        "Dampness pattern",
        "Stagnation pattern",
        "Deficiency pattern",
    ]
    .iter()
    .enumerate()
    {
        records.push(CodeRecord::new(
            format!("TM2.X{i:02}.0"),
            *display,
            "icd11-tm2",
        ));
    }
    records
}

#[test]
fn resolves_then_serves_cache_without_refetching() {
    let catalogs = CountingCatalogs::new(namaste_source(), tm2_targets());
    let engine = ResolutionEngine::new(catalogs.clone(), Arc::new(MappingStore::in_memory()));

    let first = engine.resolve("NAM001").expect("resolve NAM001");
    assert_eq!(first.source_code, "NAM001");
    assert_eq!(first.target_code, "TM2.E01.1");
    assert_eq!(first.target_display, "madhumeha disorder");
    assert_eq!(catalogs.fetch_count(), 1);

    let second = engine.resolve("NAM001").expect("re-resolve NAM001");
    assert_eq!(second, first, "cached mapping must be returned unchanged");
    assert_eq!(catalogs.fetch_count(), 1, "cache hit must not refetch");
    assert_eq!(engine.store().count(), 1);
}

#[test]
fn not_found_and_no_match_stay_distinct() {
    let catalogs = CountingCatalogs::new(namaste_source(), tm2_targets());
    let engine = ResolutionEngine::new(catalogs, Arc::new(MappingStore::in_memory()));

    let missing = engine.resolve("NAM999").expect_err("absent code");
    assert!(matches!(missing, ResolveError::NotFound(code) if code == "NAM999"));

    let unmatched = engine.resolve("NAM003").expect_err("present but unmatched");
    assert!(matches!(unmatched, ResolveError::NoMatch(code) if code == "NAM003"));

    assert_eq!(engine.store().count(), 0, "failed resolutions persist nothing");
}

#[test]
fn source_row_without_display_is_not_found() {
    let catalogs = CountingCatalogs::new(namaste_source(), tm2_targets());
    let engine = ResolutionEngine::new(catalogs, Arc::new(MappingStore::in_memory()));

    let err = engine.resolve("NAM004").expect_err("blank display");
    assert!(matches!(err, ResolveError::NotFound(_)));
}

#[test]
fn empty_target_catalog_is_no_match() {
    let catalogs = CountingCatalogs::new(namaste_source(), Vec::new());
    let engine = ResolutionEngine::new(catalogs, Arc::new(MappingStore::in_memory()));

    let err = engine.resolve("NAM001").expect_err("no candidates");
    assert!(matches!(err, ResolveError::NoMatch(_)));
}

#[test]
fn blank_input_is_a_validation_error() {
    let catalogs = CountingCatalogs::new(namaste_source(), tm2_targets());
    let engine = ResolutionEngine::new(catalogs, Arc::new(MappingStore::in_memory()));

    let err = engine.resolve("   ").expect_err("blank input");
    assert!(matches!(err, ResolveError::Validation(_)));
}

// "abcde" vs "abcdxyz" scores exactly 0.6 and must be rejected by the
// strict threshold; "abcdxy" scores 2*3/9 and must be accepted.
#[test]
fn threshold_boundary_is_strict() {
    let source = vec![CodeRecord::new("S1", "abcde", "demo")];

    let at_boundary = CountingCatalogs::new(
        source.clone(),
        vec![CodeRecord::new("T1", "abcdxyz", "demo")],
    );
    let engine = ResolutionEngine::new(at_boundary, Arc::new(MappingStore::in_memory()));
    let err = engine.resolve("S1").expect_err("score of exactly 0.6");
    assert!(matches!(err, ResolveError::NoMatch(_)));
    assert_eq!(engine.store().count(), 0);

    let above_boundary =
        CountingCatalogs::new(source, vec![CodeRecord::new("T1", "abcdxy", "demo")]);
    let engine = ResolutionEngine::new(above_boundary, Arc::new(MappingStore::in_memory()));
    let mapping = engine.resolve("S1").expect("score above 0.6");
    assert_eq!(mapping.target_code, "T1");
    assert_eq!(engine.store().count(), 1);
}

#[test]
fn concurrent_resolutions_converge_to_one_mapping() {
    let catalogs = CountingCatalogs::new(namaste_source(), tm2_targets());
    let engine = Arc::new(ResolutionEngine::new(
        catalogs,
        Arc::new(MappingStore::in_memory()),
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || engine.resolve("NAM001").expect("concurrent resolve"))
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("join resolver thread"))
        .collect();

    assert_eq!(engine.store().count(), 1, "exactly one row may be persisted");
    for mapping in &results {
        assert_eq!(mapping, &results[0], "all callers observe the same record");
    }
}

#[test]
fn existing_mapping_wins_over_rescoring() {
    let catalogs = CountingCatalogs::new(namaste_source(), tm2_targets());
    let store = Arc::new(MappingStore::in_memory());
    store
        .manual_add("NAM001", "TM2.Z99.9", "Operator override")
        .expect("manual add");

    let engine = ResolutionEngine::new(catalogs.clone(), store);
    let mapping = engine.resolve("NAM001").expect("resolve NAM001");

    assert_eq!(mapping.target_code, "TM2.Z99.9");
    assert_eq!(catalogs.fetch_count(), 0, "cache hit skips the catalog");
}
