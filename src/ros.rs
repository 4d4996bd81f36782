//! Susceptibility of functional sites to reactive-oxygen-species damage.

use crate::chains::{point_dist, ChainExt};
use crate::error::{Error, Result};
use crate::uniprot::{FunctionalSite, SiteKind, UniProtEntry};
use crate::utils::{
    entry_path, folder_name, load_model, log_pdb_warnings, structure_path, to_pretty_json,
};
use indexmap::IndexMap;
use pdbtbx::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// One-letter codes of residues prone to oxidation.
pub const SUSCEPTIBLE: [char; 9] = ['C', 'M', 'Y', 'W', 'H', 'L', 'R', 'P', 'T'];

/// Scores of one functional site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteScore {
    #[serde(rename = "type")]
    pub kind: String,
    pub start: usize,
    pub end: usize,
    /// Susceptible residues in the site
    pub score1: usize,
    /// Mean distance from site residues to the closest susceptible residue outside the site
    pub score2: f64,
    /// Cysteines in the site
    pub score3: usize,
}

/// Totals over active sites (`s1`–`s3`) and all other sites (`s4`–`s6`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalScores {
    pub s1: usize,
    pub s2: f64,
    pub s3: usize,
    pub s4: usize,
    pub s5: f64,
    pub s6: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProteinScores {
    /// Keyed by `{type}_{start}_{end}`
    #[serde(flatten)]
    pub sites: IndexMap<String, SiteScore>,
    #[serde(rename = "Total scores")]
    pub totals: TotalScores,
}

impl ProteinScores {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&text).map_err(|e| Error::json(path, e))
    }
}

/// Whether the scores are for monomer or multimer predictions.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Monomers,
    Multimers,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

pub fn total_scores(sites: &IndexMap<String, SiteScore>) -> TotalScores {
    let mut totals = TotalScores::default();
    let mut active_dist = Vec::new();
    let mut other_dist = Vec::new();
    for site in sites.values() {
        if site.kind == SiteKind::ActiveSite.to_string() {
            totals.s1 += site.score1;
            totals.s3 += site.score3;
            active_dist.push(site.score2);
        } else {
            totals.s4 += site.score1;
            totals.s6 += site.score3;
            other_dist.push(site.score2);
        }
    }
    totals.s2 = mean(&active_dist);
    totals.s5 = mean(&other_dist);
    totals
}

/// Score every site of `entry` against the structure of `chain`.
///
/// Sites whose UniProt subsequence differs from the chain subsequence at the
/// same positions are skipped.
pub fn score_sites(entry: &UniProtEntry, chain: &Chain, sites: &[FunctionalSite]) -> ProteinScores {
    let seq = entry.sequence();
    let pdb_seq = chain.pdb_seq();
    let ca = chain.ca_positions();

    let mut scores = IndexMap::new();
    for site in sites {
        let range = site.start.saturating_sub(1)..site.end;
        let subseq = seq.get(range.clone());
        if subseq.is_none() || subseq != pdb_seq.get(range.clone()) {
            error!(
                "PDB and UniProt sequences of {} {}-{} do not match on chain {}",
                site.kind,
                site.start,
                site.end,
                chain.id()
            );
            continue;
        }
        let subseq = subseq.unwrap_or_default();

        let score1 = subseq.chars().filter(|c| SUSCEPTIBLE.contains(c)).count();
        let score3 = subseq.chars().filter(|&c| c == 'C').count();

        let others: Vec<(f64, f64, f64)> = seq
            .chars()
            .enumerate()
            .filter(|(i, c)| SUSCEPTIBLE.contains(c) && !range.contains(i))
            .filter_map(|(i, _)| ca.get(&(i as isize + 1)).copied())
            .collect();

        let min_dists: Vec<f64> = if others.is_empty() {
            debug!(
                "No susceptible residues outside {} {}-{} (chain {})",
                site.kind,
                site.start,
                site.end,
                chain.id()
            );
            Vec::new()
        } else {
            (site.start..=site.end)
                .filter_map(|resi| match ca.get(&(resi as isize)) {
                    Some(pos) => Some(pos),
                    None => {
                        warn!("Residue {resi} has no CA atom on chain {}", chain.id());
                        None
                    }
                })
                .map(|pos| {
                    others
                        .iter()
                        .map(|other| point_dist(pos, other))
                        .fold(f64::INFINITY, f64::min)
                })
                .collect()
        };

        scores.insert(
            format!("{}_{}_{}", site.kind, site.start, site.end),
            SiteScore {
                kind: site.kind.to_string(),
                start: site.start,
                end: site.end,
                score1,
                score2: mean(&min_dists),
                score3,
            },
        );
    }

    let totals = total_scores(&scores);
    ProteinScores {
        sites: scores,
        totals,
    }
}

/// Sites of an entry, or `None` if it has none.
fn entry_sites(entry: &UniProtEntry) -> Option<Vec<FunctionalSite>> {
    entry.functional_sites().filter(|sites| !sites.is_empty())
}

pub fn scores_path(folder: &Path) -> PathBuf {
    let name = folder_name(folder);
    folder.join(format!("{name}_Susceptibility_Scores.json"))
}

/// Score the single protein of a monomer folder on chain `A`, or on the
/// first chain if there is no chain `A`.
pub fn score_monomer_folder(folder: &Path) -> Result<ProteinScores> {
    let name = folder_name(folder);
    let entry = UniProtEntry::load(&entry_path(folder, &name))?;
    let Some(sites) = entry_sites(&entry) else {
        warn!("No sites found for protein {name}");
        return Ok(ProteinScores::default());
    };

    let (pdb, warnings) = load_model(&structure_path(folder))?;
    log_pdb_warnings(&warnings);
    let chain = pdb
        .chains()
        .find(|c| c.id() == "A")
        .or_else(|| pdb.chains().next());
    match chain {
        Some(chain) => Ok(score_sites(&entry, chain, &sites)),
        None => {
            warn!("No chains in the structure of {name}");
            Ok(ProteinScores::default())
        }
    }
}

/// Score every protein of a complex folder. The folder name lists the
/// proteins separated by `-`; each is paired with the chains in order.
pub fn score_multimer_folder(folder: &Path) -> Result<IndexMap<String, ProteinScores>> {
    let name = folder_name(folder);
    let (pdb, warnings) = load_model(&structure_path(folder))?;
    log_pdb_warnings(&warnings);

    let mut results = IndexMap::new();
    for (prot, chain) in name.split('-').zip(pdb.chains()) {
        let path = entry_path(folder, prot);
        if !path.exists() {
            warn!("No UniProt entry for {prot} in {name}");
            continue;
        }
        let entry = UniProtEntry::load(&path)?;
        let Some(sites) = entry_sites(&entry) else {
            warn!("No sites found for protein {prot}");
            continue;
        };
        results.insert(prot.to_string(), score_sites(&entry, chain, &sites));
    }
    Ok(results)
}

/// Score one folder in the given mode and write the JSON result next to the inputs.
pub fn process_folder(folder: &Path, mode: Mode) -> Result<PathBuf> {
    let path = scores_path(folder);
    let text = match mode {
        Mode::Monomers => to_pretty_json(&score_monomer_folder(folder)?),
        Mode::Multimers => to_pretty_json(&score_multimer_folder(folder)?),
    }
    .map_err(|e| Error::json(&path, e))?;
    std::fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
    Ok(path)
}
