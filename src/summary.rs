//! Per-protein summary of site susceptibility, disulfide bonds and cofactors.

use crate::cache::IdCache;
use crate::chains::{point_dist, ChainExt};
use crate::cofactors::{Cofactor, Cofactors};
use crate::disulfide::{bonds_from_df, bonds_path};
use crate::error::Result;
use crate::ros::{scores_path, ProteinScores};
use crate::uniprot::UniProtEntry;
use crate::utils::{
    entry_path, folder_name, load_model, log_pdb_warnings, read_df_from_file, structure_path,
    DataFrameFileType,
};
use pdbtbx::*;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, trace};

/// `name (formula)` of every cofactor, joined with ` AND `.
pub fn describe_cofactors(cofactors: &[Cofactor]) -> String {
    cofactors
        .iter()
        .map(|c| format!("{} ({})", c.name, c.formula))
        .collect::<Vec<_>>()
        .join(" AND ")
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub kegg_id: String,
    pub uniprot_id: Option<String>,
    pub gene: Option<String>,
    pub protein: Option<String>,
    pub sr_in_as: usize,
    pub sr_as_distance: f64,
    pub cys_in_as: usize,
    pub sr_in_bs: usize,
    pub sr_bs_distance: f64,
    pub cys_in_bs: usize,
    pub disulfide_bonds: usize,
    pub disulfide_site_distance: f64,
    pub cofactor: String,
}

/// Mean over bonds of the distance between the bond and its closest site.
///
/// The distance between a bond and a site is the mean, over the site residues,
/// of the mean SG–CA distance of the two cysteines. Returns 0 when there is
/// nothing to measure.
pub fn disulfide_site_distance(
    bonds: &[(isize, isize)],
    sites: &[(usize, usize)],
    chain: &Chain,
) -> f64 {
    let sg = chain.atom_positions("SG");
    let ca = chain.ca_positions();

    let per_bond: Vec<f64> = bonds
        .iter()
        .filter_map(|(res1, res2)| {
            let (Some(sg1), Some(sg2)) = (sg.get(res1), sg.get(res2)) else {
                trace!("Bond {res1}_{res2} has no SG atoms in the structure");
                return None;
            };
            sites
                .iter()
                .filter_map(|&(start, end)| {
                    let d: Vec<f64> = (start..=end)
                        .filter_map(|resi| ca.get(&(resi as isize)))
                        .map(|pos| (point_dist(sg1, pos) + point_dist(sg2, pos)) / 2.0)
                        .collect();
                    (!d.is_empty()).then(|| d.iter().sum::<f64>() / d.len() as f64)
                })
                .reduce(f64::min)
        })
        .collect();

    if per_bond.is_empty() {
        0.0
    } else {
        per_bond.iter().sum::<f64>() / per_bond.len() as f64
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Collect the summary of one monomer folder.
///
/// The UniProt entry, the scores and the structure are required; a missing
/// disulfide table counts as no bonds.
pub fn summarize_folder(
    folder: &Path,
    bonds_format: DataFrameFileType,
    cache: Option<&IdCache>,
    cofactors: Option<&Cofactors>,
) -> Result<SummaryRow> {
    let name = folder_name(folder);
    let entry = UniProtEntry::load(&entry_path(folder, &name))?;
    let scores = ProteinScores::load(&scores_path(folder))?;

    let bonds_file = bonds_path(folder);
    let bonds = if bonds_file.with_extension(bonds_format.to_string()).exists() {
        bonds_from_df(&read_df_from_file(&bonds_file, bonds_format)?)?
    } else {
        debug!("No disulfide bonds table for {name}");
        Vec::new()
    };

    let (pdb, warnings) = load_model(&structure_path(folder))?;
    log_pdb_warnings(&warnings);

    let sites: Vec<(usize, usize)> = scores.sites.values().map(|s| (s.start, s.end)).collect();
    let distance = pdb
        .chains()
        .find(|c| c.id() == "A")
        .or_else(|| pdb.chains().next())
        .map_or(0.0, |chain| disulfide_site_distance(&bonds, &sites, chain));

    let uniprot_id = cache
        .and_then(|c| c.accession(&name))
        .or(entry.primary_accession.as_deref())
        .map(str::to_string);
    let cofactor = cofactors
        .and_then(|c| c.get(&name))
        .map(|c| describe_cofactors(c))
        .unwrap_or_default();

    let t = &scores.totals;
    Ok(SummaryRow {
        uniprot_id,
        gene: entry.gene_name().map(str::to_string),
        protein: entry.protein_name().map(str::to_string),
        sr_in_as: t.s1,
        sr_as_distance: round2(t.s2),
        cys_in_as: t.s3,
        sr_in_bs: t.s4,
        sr_bs_distance: round2(t.s5),
        cys_in_bs: t.s6,
        disulfide_bonds: bonds.len(),
        disulfide_site_distance: round2(distance),
        cofactor,
        kegg_id: name,
    })
}

pub fn rows_to_df(rows: &[SummaryRow]) -> Result<DataFrame> {
    Ok(df!(
        "KEGG ID" => rows.iter().map(|r| r.kegg_id.clone()).collect::<Vec<String>>(),
        "UniProt ID" => rows.iter().map(|r| r.uniprot_id.clone()).collect::<Vec<Option<String>>>(),
        "Gene" => rows.iter().map(|r| r.gene.clone()).collect::<Vec<Option<String>>>(),
        "Protein" => rows.iter().map(|r| r.protein.clone()).collect::<Vec<Option<String>>>(),
        "# SR in AS" => rows.iter().map(|r| r.sr_in_as as u32).collect::<Vec<u32>>(),
        "Mean SR - AS minimum distance" => rows.iter().map(|r| r.sr_as_distance).collect::<Vec<f64>>(),
        "cys in AS" => rows.iter().map(|r| r.cys_in_as as u32).collect::<Vec<u32>>(),
        "# SR in BS" => rows.iter().map(|r| r.sr_in_bs as u32).collect::<Vec<u32>>(),
        "Mean SR - BS minimum distance" => rows.iter().map(|r| r.sr_bs_distance).collect::<Vec<f64>>(),
        "cys in BS" => rows.iter().map(|r| r.cys_in_bs as u32).collect::<Vec<u32>>(),
        "# Disulfide bonds" => rows.iter().map(|r| r.disulfide_bonds as u32).collect::<Vec<u32>>(),
        "Mean S-S - AS/BS minimum distance" => rows.iter().map(|r| r.disulfide_site_distance).collect::<Vec<f64>>(),
        "Cofactor" => rows.iter().map(|r| r.cofactor.clone()).collect::<Vec<String>>(),
    )?)
}
