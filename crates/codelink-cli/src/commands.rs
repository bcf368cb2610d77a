//! Subcommand implementations.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use comfy_table::Table;

use codelink_catalog::{CodeCatalogs, load_catalog_csv};
use codelink_model::{CatalogId, Mapping};
use codelink_resolve::{MappingStore, ResolutionEngine, ResolveError, import_all};

use crate::cli::{CatalogArg, CatalogLoadArgs, MapAddArgs, MapImportArgs, ResolveArgs, SearchArgs};
use crate::summary::{apply_table_style, header_cell};

fn catalog_id(arg: CatalogArg) -> CatalogId {
    match arg {
        CatalogArg::Source => CatalogId::Source,
        CatalogArg::Target => CatalogId::Target,
    }
}

pub fn run_catalog_load(data_dir: &Path, args: &CatalogLoadArgs) -> Result<()> {
    let catalog = catalog_id(args.catalog);
    let catalogs = CodeCatalogs::open(data_dir).context("open catalogs")?;
    let records = load_catalog_csv(&args.csv_path)
        .with_context(|| format!("load catalog CSV {}", args.csv_path.display()))?;
    let stored = catalogs
        .replace(catalog, records)
        .context("replace catalog table")?;
    println!("loaded {stored} codes into the {catalog} catalog");
    Ok(())
}

pub fn run_resolve(data_dir: &Path, args: &ResolveArgs) -> Result<()> {
    let catalogs = CodeCatalogs::open(data_dir).context("open catalogs")?;
    let store = Arc::new(MappingStore::open(data_dir).context("open mapping store")?);
    let engine = ResolutionEngine::new(catalogs, store);

    match engine.resolve(&args.code) {
        Ok(mapping) => {
            let json = serde_json::to_string_pretty(&mapping).context("serialize mapping")?;
            println!("{json}");
            Ok(())
        }
        Err(ResolveError::NotFound(code)) => {
            bail!("source code '{code}' not found - check the code or reload the source catalog")
        }
        Err(ResolveError::NoMatch(code)) => {
            bail!("no qualifying match for '{code}' - consider adding a manual mapping")
        }
        Err(error) => Err(error.into()),
    }
}

pub fn run_map_list(data_dir: &Path) -> Result<()> {
    let store = MappingStore::open(data_dir).context("open mapping store")?;
    let mappings = store.list_all().context("list mappings")?;
    if mappings.is_empty() {
        println!("no mappings cached");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Target"),
        header_cell("Target display"),
        header_cell("Created"),
    ]);
    apply_table_style(&mut table);
    for mapping in &mappings {
        table.add_row(vec![
            mapping.source_code.clone(),
            mapping.target_code.clone(),
            mapping.target_display.clone(),
            mapping.created_at.to_rfc3339(),
        ]);
    }
    println!("{table}");
    println!("{} mappings", mappings.len());
    Ok(())
}

pub fn run_map_add(data_dir: &Path, args: &MapAddArgs) -> Result<()> {
    let store = MappingStore::open(data_dir).context("open mapping store")?;
    let outcome = store
        .manual_add(&args.source_code, &args.target_code, &args.target_display)
        .context("add mapping")?;

    if outcome.created {
        println!("mapping created");
    } else {
        println!("mapping already existed; returning the stored record");
    }
    let json = serde_json::to_string_pretty(&outcome.mapping).context("serialize mapping")?;
    println!("{json}");
    Ok(())
}

pub fn run_map_import(data_dir: &Path, args: &MapImportArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.json_path)
        .with_context(|| format!("read import file {}", args.json_path.display()))?;
    let records: Vec<Mapping> = serde_json::from_str(&contents)
        .with_context(|| format!("parse import file {}", args.json_path.display()))?;

    let store = MappingStore::open(data_dir).context("open mapping store")?;
    let imported = import_all(&store, records).context("import mapping batch")?;
    println!("imported {imported} mappings");
    Ok(())
}

pub fn run_search(data_dir: &Path, args: &SearchArgs) -> Result<()> {
    let catalog = catalog_id(args.catalog);
    let catalogs = CodeCatalogs::open(data_dir).context("open catalogs")?;
    let hits = catalogs.search(catalog, &args.query);
    if hits.is_empty() {
        println!("no matches in the {catalog} catalog");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Display"),
        header_cell("System"),
    ]);
    apply_table_style(&mut table);
    for record in &hits {
        table.add_row(vec![
            record.code.clone(),
            record.display.clone(),
            record.system.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}
