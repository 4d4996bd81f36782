//! Disulfide-bond detection between cysteine pairs.
//!
//! A pair of cysteines is bonded when their SG atoms are 1.5–2.5 Å apart and the
//! CB–SG–SG–CB dihedral is within 84–96° in absolute value. Only cysteines that
//! pass a model-specific confidence filter on their `C` atom are considered.

use crate::error::{Error, Result};
use crate::residues::{atom_vec, dihedral, ResidueExt};
use crate::uniprot::UniProtEntry;
use crate::utils::{
    entry_path, folder_name, load_model, log_pdb_warnings, structure_path, write_df_to_file,
    DataFrameFileType,
};
use indexmap::IndexMap;
use pdbtbx::*;
use polars::prelude::*;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Minimum pLDDT of AlphaFold models
pub const PLDDT_LIMIT: f64 = 50.0;
/// Maximum B-factor of experimental structures
pub const B_FACTOR_LIMIT: f64 = 30.0;
/// Minimum QMEAN of SWISS-MODEL models
pub const QMEAN_LIMIT: f64 = 0.7;

const SS_DIST_MIN: f64 = 1.5;
const SS_DIST_MAX: f64 = 2.5;
const SS_DIHEDRAL_MIN: f64 = 84.0;
const SS_DIHEDRAL_MAX: f64 = 96.0;

/// Origin of a structure, which determines what its B-factor column means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelSource {
    /// AlphaFold prediction, B-factor holds pLDDT
    AlphaFold,
    /// SWISS-MODEL homology model, B-factor holds QMEAN
    SwissModel,
    /// Experimental structure, B-factor is a temperature factor
    Experimental,
}

impl ModelSource {
    /// Guess the source from the header of a PDB file. Anything that is not
    /// marked as a SWISS-MODEL model is treated as an AlphaFold prediction.
    pub fn detect(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::from_header(&text))
    }

    pub fn from_header(text: &str) -> Self {
        let swiss = text
            .lines()
            .take_while(|line| !line.starts_with("ATOM") && !line.starts_with("HETATM"))
            .any(|line| line.to_uppercase().contains("SWISS-MODEL"));
        if swiss {
            ModelSource::SwissModel
        } else {
            ModelSource::AlphaFold
        }
    }

    /// Whether a residue with this B-factor value is confident enough.
    pub fn passes_quality(&self, b_factor: f64) -> bool {
        match self {
            ModelSource::AlphaFold => b_factor > PLDDT_LIMIT,
            ModelSource::SwissModel => b_factor > QMEAN_LIMIT,
            ModelSource::Experimental => b_factor < B_FACTOR_LIMIT,
        }
    }
}

impl std::fmt::Display for ModelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ModelSource::AlphaFold => write!(f, "alphafold"),
            ModelSource::SwissModel => write!(f, "swiss-model"),
            ModelSource::Experimental => write!(f, "experimental"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondSource {
    /// Listed in the UniProt entry
    Annotated,
    /// Found in the structure
    Structure,
}

impl std::fmt::Display for BondSource {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BondSource::Annotated => write!(f, "uniprot"),
            BondSource::Structure => write!(f, "structure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisulfideBond {
    pub res1: isize,
    pub res2: isize,
    /// SG–SG distance, only known for bonds found in the structure
    pub distance: Option<f64>,
    /// CB–SG–SG–CB dihedral in degrees
    pub dihedral: Option<f64>,
    pub source: BondSource,
}

impl DisulfideBond {
    /// Residue pair key, `res1_res2`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.res1, self.res2)
    }
}

struct Cysteine<'a> {
    resi: isize,
    cb: &'a Atom,
    sg: &'a Atom,
}

/// Find disulfide bonds in the first model of `pdb`.
pub fn find_disulfides(pdb: &PDB, source: ModelSource) -> Vec<DisulfideBond> {
    let Some(model) = pdb.models().next() else {
        return Vec::new();
    };

    let cysteines: Vec<Cysteine> = model
        .chains()
        .flat_map(|chain| chain.residues())
        .filter(|res| res.is_cysteine())
        .filter(|res| {
            res.atom_named("C")
                .is_some_and(|c| source.passes_quality(c.b_factor()))
        })
        .filter_map(|res| {
            Some(Cysteine {
                resi: res.serial_number(),
                cb: res.atom_named("CB")?,
                sg: res.atom_named("SG")?,
            })
        })
        .collect();

    (0..cysteines.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let cysteines = &cysteines;
            ((i + 1)..cysteines.len()).filter_map(move |j| bond_between(&cysteines[i], &cysteines[j]))
        })
        .collect()
}

fn bond_between(cys1: &Cysteine, cys2: &Cysteine) -> Option<DisulfideBond> {
    let d = cys1.sg.distance(cys2.sg);
    if !(SS_DIST_MIN..=SS_DIST_MAX).contains(&d) {
        return None;
    }

    let chi = dihedral(
        &atom_vec(cys1.cb),
        &atom_vec(cys1.sg),
        &atom_vec(cys2.sg),
        &atom_vec(cys2.cb),
    );
    if !(SS_DIHEDRAL_MIN..=SS_DIHEDRAL_MAX).contains(&chi.abs()) {
        return None;
    }

    Some(DisulfideBond {
        res1: cys1.resi,
        res2: cys2.resi,
        distance: Some(d),
        dihedral: Some(chi),
        source: BondSource::Structure,
    })
}

/// Combine annotated and detected bonds, annotated first, unique by residue pair.
pub fn merge_bonds(annotated: &[(usize, usize)], detected: Vec<DisulfideBond>) -> Vec<DisulfideBond> {
    let mut merged: IndexMap<String, DisulfideBond> = IndexMap::new();
    let annotated = annotated.iter().map(|&(start, end)| DisulfideBond {
        res1: start as isize,
        res2: end as isize,
        distance: None,
        dihedral: None,
        source: BondSource::Annotated,
    });
    for bond in annotated.chain(detected) {
        merged.entry(bond.key()).or_insert(bond);
    }
    merged.into_values().collect()
}

/// Annotated and detected bonds of one protein.
pub fn protein_disulfides(
    pdb: &PDB,
    source: ModelSource,
    entry: Option<&UniProtEntry>,
) -> Vec<DisulfideBond> {
    let annotated = entry.map(|e| e.annotated_disulfides()).unwrap_or_default();
    merge_bonds(&annotated, find_disulfides(pdb, source))
}

pub fn bonds_to_df(bonds: &[DisulfideBond]) -> Result<DataFrame> {
    Ok(df!(
        "bond" => bonds.iter().map(DisulfideBond::key).collect::<Vec<String>>(),
        "res1" => bonds.iter().map(|b| b.res1 as i64).collect::<Vec<i64>>(),
        "res2" => bonds.iter().map(|b| b.res2 as i64).collect::<Vec<i64>>(),
        "distance" => bonds.iter().map(|b| b.distance.map(|d| d as f32)).collect::<Vec<Option<f32>>>(),
        "dihedral" => bonds.iter().map(|b| b.dihedral.map(|d| d as f32)).collect::<Vec<Option<f32>>>(),
        "source" => bonds.iter().map(|b| b.source.to_string()).collect::<Vec<String>>(),
    )?)
}

/// Residue pairs from a table written by [`bonds_to_df`].
pub fn bonds_from_df(df: &DataFrame) -> Result<Vec<(isize, isize)>> {
    let res1 = df.column("res1")?.cast(&DataType::Int64)?;
    let res2 = df.column("res2")?.cast(&DataType::Int64)?;
    Ok(res1
        .i64()?
        .into_iter()
        .zip(res2.i64()?.into_iter())
        .filter_map(|(a, b)| Some((a? as isize, b? as isize)))
        .collect())
}

/// `{name}/{name}_Disulfide_Bonds`, without extension.
pub fn bonds_path(folder: &Path) -> PathBuf {
    folder.join(format!("{}_Disulfide_Bonds", folder_name(folder)))
}

/// Detect the bonds of one protein folder and write them as a table.
///
/// Returns `None` when the folder already holds a result. The UniProt entry is
/// optional; without it only structural bonds are reported.
pub fn process_folder(
    folder: &Path,
    source: Option<ModelSource>,
    file_type: DataFrameFileType,
) -> Result<Option<PathBuf>> {
    let out = bonds_path(folder);
    if out.with_extension(file_type.to_string()).exists() {
        debug!("Skipping {}, results exist", folder.display());
        return Ok(None);
    }

    let pdb_path = structure_path(folder);
    let source = match source {
        Some(source) => source,
        None => ModelSource::detect(&pdb_path)?,
    };
    debug!("Treating {} as {source} model", pdb_path.display());

    let (pdb, warnings) = load_model(&pdb_path)?;
    log_pdb_warnings(&warnings);

    let entry_file = entry_path(folder, &folder_name(folder));
    let entry = if entry_file.exists() {
        Some(UniProtEntry::load(&entry_file)?)
    } else {
        warn!("No UniProt entry in {}", folder.display());
        None
    };

    let bonds = protein_disulfides(&pdb, source, entry.as_ref());
    let mut df = bonds_to_df(&bonds)?;
    write_df_to_file(&mut df, &out, file_type).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniprot::tests::ENTRY;
    use crate::utils::fixtures::{atom, residue_atoms, write_pdb, FixtureAtom};
    use crate::utils::read_df_from_file;

    /// Two cysteines whose SG atoms are 2.05 Å apart with the given CB2 position.
    fn cys_pair(cb2: [f64; 3], b_factor: f64) -> Vec<FixtureAtom> {
        let mut atoms = Vec::new();
        for (resi, ca, cb, sg) in [
            (10, [-1.0, 3.0, 0.0], [-0.5, 1.75, 0.0], [0.0, 0.0, 0.0]),
            (42, [3.5, 0.0, 3.0], cb2, [2.05, 0.0, 0.0]),
        ] {
            atoms.push(atom('A', resi, "CYS", "N", [ca[0] - 1.0, ca[1] + 1.0, ca[2]], b_factor));
            atoms.push(atom('A', resi, "CYS", "CA", ca, b_factor));
            atoms.push(atom('A', resi, "CYS", "C", [ca[0] + 1.0, ca[1] + 1.0, ca[2]], b_factor));
            atoms.push(atom('A', resi, "CYS", "CB", cb, b_factor));
            atoms.push(atom('A', resi, "CYS", "SG", sg, b_factor));
        }
        atoms
    }

    fn detect(atoms: &[FixtureAtom], source: ModelSource) -> Vec<DisulfideBond> {
        let file = write_pdb(atoms, &[]);
        let (pdb, _) = load_model(file.path()).unwrap();
        find_disulfides(&pdb, source)
    }

    #[test]
    fn ideal_bond_is_found() {
        let bonds = detect(&cys_pair([2.55, 0.0, 1.75], 90.0), ModelSource::AlphaFold);
        assert_eq!(bonds.len(), 1);
        assert_eq!(bonds[0].key(), "10_42");
        assert!((bonds[0].distance.unwrap() - 2.05).abs() < 1e-3);
        assert!((bonds[0].dihedral.unwrap().abs() - 90.0).abs() < 0.1);
    }

    #[test]
    fn wrong_dihedral_is_rejected() {
        let bonds = detect(&cys_pair([2.55, 1.75, 0.0], 90.0), ModelSource::AlphaFold);
        assert!(bonds.is_empty());
    }

    #[test]
    fn distant_cysteines_are_rejected() {
        let mut atoms = residue_atoms('A', 1, "CYS", [0.0, 0.0, 0.0], 90.0);
        atoms.extend(residue_atoms('A', 2, "CYS", [10.0, 0.0, 0.0], 90.0));
        assert!(detect(&atoms, ModelSource::AlphaFold).is_empty());
    }

    #[test]
    fn quality_filter_depends_on_source() {
        let atoms = cys_pair([2.55, 0.0, 1.75], 20.0);
        // Low pLDDT for a prediction, but a good B-factor for a crystal structure
        assert!(detect(&atoms, ModelSource::AlphaFold).is_empty());
        assert_eq!(detect(&atoms, ModelSource::Experimental).len(), 1);
        assert_eq!(detect(&atoms, ModelSource::SwissModel).len(), 1);
    }

    #[test]
    fn detect_source_from_header() {
        assert_eq!(
            ModelSource::from_header("TITLE     ALPHAFOLD MONOMER V2.0 PREDICTION\nATOM      1"),
            ModelSource::AlphaFold
        );
        assert_eq!(
            ModelSource::from_header("REMARK   1 SWISS-MODEL SERVER\nATOM      1"),
            ModelSource::SwissModel
        );
        assert_eq!(
            ModelSource::from_header("ATOM      1\nREMARK swiss-model"),
            ModelSource::AlphaFold
        );
    }

    #[test]
    fn annotated_bonds_come_first_and_are_unique() {
        let detected = vec![
            DisulfideBond {
                res1: 10,
                res2: 42,
                distance: Some(2.05),
                dihedral: Some(90.0),
                source: BondSource::Structure,
            },
            DisulfideBond {
                res1: 50,
                res2: 77,
                distance: Some(2.0),
                dihedral: Some(-88.0),
                source: BondSource::Structure,
            },
        ];
        let merged = merge_bonds(&[(10, 42), (3, 8)], detected);
        assert_eq!(
            merged.iter().map(DisulfideBond::key).collect::<Vec<_>>(),
            vec!["10_42", "3_8", "50_77"]
        );
        assert_eq!(merged[0].source, BondSource::Annotated);
        assert_eq!(merged[2].source, BondSource::Structure);

        let df = bonds_to_df(&merged).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(bonds_from_df(&df).unwrap(), vec![(10, 42), (3, 8), (50, 77)]);
    }

    #[test]
    fn folder_results_are_written_once() {
        let root = tempfile::tempdir().unwrap();
        let folder = root.path().join("PP_0001");
        std::fs::create_dir(&folder).unwrap();
        let pdb = write_pdb(&cys_pair([2.55, 0.0, 1.75], 90.0), &["TITLE     ALPHAFOLD MODEL"]);
        std::fs::copy(pdb.path(), folder.join("PP_0001.pdb")).unwrap();
        std::fs::write(folder.join("PP_0001_UniProt_Features.json"), ENTRY).unwrap();

        let out = process_folder(&folder, None, DataFrameFileType::Tsv)
            .unwrap()
            .unwrap();
        assert_eq!(out.file_name().unwrap(), "PP_0001_Disulfide_Bonds.tsv");

        let df = read_df_from_file(&bonds_path(&folder), DataFrameFileType::Tsv).unwrap();
        assert_eq!(bonds_from_df(&df).unwrap(), vec![(2, 6), (10, 42)]);

        assert!(process_folder(&folder, None, DataFrameFileType::Tsv)
            .unwrap()
            .is_none());
    }
}
