//! Metal-containing cofactors of each protein, from UniProt cofactor
//! annotations and a ChEBI formula table.

use crate::error::{Error, Result};
use crate::uniprot::UniProtEntry;
use crate::utils::{entry_path, folder_name, to_pretty_json};
use indexmap::IndexMap;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Element symbols of the d-block.
pub const TRANSITION_METALS: [&str; 40] = [
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", //
    "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", //
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", //
    "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cofactor {
    #[serde(rename = "Cofactor name")]
    pub name: String,
    #[serde(rename = "CheBI ID", default)]
    pub chebi_id: String,
    #[serde(rename = "Formula")]
    pub formula: String,
}

/// Cofactors of each protein, keyed by identifier.
pub type Cofactors = IndexMap<String, Vec<Cofactor>>;

pub fn load_cofactors(path: &Path) -> Result<Cofactors> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::json(path, e))
}

pub fn save_cofactors(cofactors: &Cofactors, path: &Path) -> Result<()> {
    let text = to_pretty_json(cofactors).map_err(|e| Error::json(path, e))?;
    std::fs::write(path, text).map_err(|e| Error::io(path, e))
}

/// Element symbols of a chemical formula, in order of appearance.
pub fn elements(formula: &str) -> Vec<&str> {
    let mut symbols = Vec::new();
    let mut start = None;
    for (i, c) in formula.char_indices() {
        if c.is_ascii_lowercase() {
            continue;
        }
        if let Some(s) = start.take() {
            symbols.push(&formula[s..i]);
        }
        if c.is_ascii_uppercase() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        symbols.push(&formula[s..]);
    }
    symbols
}

pub fn has_transition_metal(formula: &str) -> bool {
    elements(formula)
        .iter()
        .any(|e| TRANSITION_METALS.contains(e))
}

/// Chemical formulas keyed by numeric ChEBI id.
#[derive(Debug, Clone, Default)]
pub struct ChebiFormulas {
    formulas: HashMap<String, String>,
}

impl ChebiFormulas {
    /// Read a tab-separated table with `compound_id` and `formula` columns.
    /// Gzip-compressed files are decompressed on the fly.
    pub fn load(path: &Path) -> Result<Self> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(CsvParseOptions::default().with_separator(b'\t'))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;
        debug!("Loaded chemical table {} with shape {:?}", path.display(), df.shape());
        Self::from_df(&df)
    }

    pub fn from_df(df: &DataFrame) -> Result<Self> {
        let df = df
            .clone()
            .lazy()
            .select([
                col("compound_id").cast(DataType::String),
                col("formula").cast(DataType::String),
            ])
            .collect()?;

        let formulas = df
            .column("compound_id")?
            .str()?
            .into_iter()
            .zip(df.column("formula")?.str()?.into_iter())
            .filter_map(|(id, formula)| Some((id?.to_string(), formula?.to_string())))
            .collect();
        Ok(Self { formulas })
    }

    /// Formula of a ChEBI id, with or without the `CHEBI:` prefix.
    pub fn formula(&self, chebi_id: &str) -> Option<&str> {
        let id = chebi_id.strip_prefix("CHEBI:").unwrap_or(chebi_id);
        self.formulas.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}

/// Annotated cofactors of `entry` whose formula holds a transition metal.
pub fn protein_cofactors(entry: &UniProtEntry, chebi: &ChebiFormulas) -> Vec<Cofactor> {
    entry
        .chebi_cofactors()
        .into_iter()
        .filter_map(|(name, id)| {
            let Some(formula) = chebi.formula(id) else {
                warn!("ChEBI id {id} not found");
                return None;
            };
            has_transition_metal(formula).then(|| Cofactor {
                name: name.to_string(),
                chebi_id: id.to_string(),
                formula: formula.to_string(),
            })
        })
        .collect()
}

/// Metal cofactors of every protein folder that has any.
pub fn collect_cofactors(folders: &[PathBuf], chebi: &ChebiFormulas) -> Cofactors {
    let mut cofactors = Cofactors::new();
    for folder in folders {
        let name = folder_name(folder);
        let entry = match UniProtEntry::load(&entry_path(folder, &name)) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };
        let found = protein_cofactors(&entry, chebi);
        if !found.is_empty() {
            cofactors.insert(name, found);
        }
    }
    cofactors
}
