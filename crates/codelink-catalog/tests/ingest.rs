use std::io::Write;

use codelink_catalog::{CatalogError, load_catalog_csv};

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("temp csv");
    file.write_all(contents.as_bytes()).expect("write csv");
    file
}

#[test]
fn parses_rows_in_header_order_independent_way() {
    let file = write_csv(
        "display,system,code\n\
         madhumeha,namaste,NAM001\n\
         amlapitta,namaste,NAM002\n",
    );
    let records = load_catalog_csv(file.path()).expect("parse csv");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].code, "NAM001");
    assert_eq!(records[0].display, "madhumeha");
    assert_eq!(records[1].system, "namaste");
}

#[test]
fn trims_fields_and_skips_rows_without_code() {
    let file = write_csv(
        "code,display,system\n\
         \u{20}NAM001 , madhumeha ,namaste\n\
         ,orphan display,namaste\n\
         NAM003,,namaste\n",
    );
    let records = load_catalog_csv(file.path()).expect("parse csv");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].code, "NAM001");
    assert_eq!(records[0].display, "madhumeha");
    // Incomplete row survives ingestion; the resolver filters it later.
    assert_eq!(records[1].code, "NAM003");
    assert!(records[1].display.is_empty());
}

#[test]
fn missing_code_column_is_an_error() {
    let file = write_csv("display,system\nmadhumeha,namaste\n");
    let err = load_catalog_csv(file.path()).expect_err("should reject csv");
    match err {
        CatalogError::Csv { message, .. } => {
            assert!(message.contains("code"), "unexpected message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn header_names_match_case_insensitively() {
    let file = write_csv("Code,Display,System\nNAM001,madhumeha,namaste\n");
    let records = load_catalog_csv(file.path()).expect("parse csv");
    assert_eq!(records.len(), 1);
}
