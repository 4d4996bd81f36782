use super::assembly::Assemblies;
use crate::error::{Error, Result};
use indexmap::IndexSet;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Column holding the gene-reaction rules in a metabolic model table.
pub const DEFAULT_RULE_COLUMN: &str = "GPR";

/// Read the unique, non-blank rules of a tab-separated model table.
pub fn read_rules(path: &Path, column: &str) -> Result<Vec<String>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .with_parse_options(CsvParseOptions::default().with_separator(b'\t'))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!("Loaded model table {} with shape {:?}", path.display(), df.shape());

    rules_from_df(&df, column)
}

/// Extract the unique, non-blank rules of `column` in order of first appearance.
pub fn rules_from_df(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let rules = df
        .column(column)
        .map_err(|_| Error::MissingColumn(column.to_string()))?
        .cast(&DataType::String)?;

    let unique: IndexSet<String> = rules
        .str()?
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|rule| !rule.is_empty())
        .map(str::to_string)
        .collect();

    Ok(unique.into_iter().collect())
}

/// One row per monomer: `id`, `plasmid`.
pub fn monomers_to_df(assemblies: &Assemblies) -> Result<DataFrame> {
    let ids: Vec<&str> = assemblies.monomers.iter().map(|id| id.as_str()).collect();
    Ok(df!(
        "id" => ids,
        "plasmid" => assemblies.monomers.iter().map(|id| id.is_plasmid()).collect::<Vec<bool>>(),
    )?)
}

/// One row per complex: `complex` (file name stem), `members` (comma-separated), `size`.
pub fn complexes_to_df(assemblies: &Assemblies) -> Result<DataFrame> {
    let complexes: Vec<_> = assemblies.complexes.iter().collect();
    Ok(df!(
        "complex" => complexes.iter().map(|c| c.name()).collect::<Vec<String>>(),
        "members" => complexes
            .iter()
            .map(|c| c.members().iter().map(|m| m.as_str()).collect::<Vec<_>>().join(","))
            .collect::<Vec<String>>(),
        "size" => complexes.iter().map(|c| c.members().len() as u32).collect::<Vec<u32>>(),
    )?)
}

/// One row per rule: `rule`, `shape`, `monomers`, `complexes`.
pub fn reports_to_df(assemblies: &Assemblies) -> Result<DataFrame> {
    let reports = &assemblies.reports;
    Ok(df!(
        "rule" => reports.iter().map(|r| r.rule.as_str()).collect::<Vec<&str>>(),
        "shape" => reports.iter().map(|r| r.shape.to_string()).collect::<Vec<String>>(),
        "monomers" => reports.iter().map(|r| r.n_monomers as u32).collect::<Vec<u32>>(),
        "complexes" => reports.iter().map(|r| r.n_complexes as u32).collect::<Vec<u32>>(),
    )?)
}
