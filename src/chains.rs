use crate::residues::ResidueExt;
use pdbtbx::*;
use std::collections::HashMap;

pub trait ChainExt {
    /// One-letter sequence of the chain; unknown residues are `X`.
    fn pdb_seq(&self) -> String;

    /// CA coordinates keyed by residue number.
    fn ca_positions(&self) -> HashMap<isize, (f64, f64, f64)>;

    /// Coordinates of atom `name` keyed by residue number.
    fn atom_positions(&self, name: &str) -> HashMap<isize, (f64, f64, f64)>;
}

impl ChainExt for Chain {
    fn pdb_seq(&self) -> String {
        self.residues()
            .map(|res| res.resn().unwrap_or("X"))
            .collect()
    }

    fn ca_positions(&self) -> HashMap<isize, (f64, f64, f64)> {
        self.atom_positions("CA")
    }

    fn atom_positions(&self, name: &str) -> HashMap<isize, (f64, f64, f64)> {
        self.residues()
            .filter_map(|res| Some((res.serial_number(), res.atom_named(name)?.pos())))
            .collect()
    }
}

/// Euclidean distance between two points.
pub fn point_dist(a: &(f64, f64, f64), b: &(f64, f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2) + (a.2 - b.2).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fixtures::{residue_atoms, write_pdb};
    use crate::utils::load_model;

    #[test]
    fn test_pdb_seq() {
        let mut atoms = residue_atoms('A', 1, "MET", [0.0, 0.0, 0.0], 90.0);
        atoms.extend(residue_atoms('A', 2, "CYS", [3.8, 0.0, 0.0], 90.0));
        atoms.extend(residue_atoms('A', 3, "TRP", [7.6, 0.0, 0.0], 90.0));
        let file = write_pdb(&atoms, &[]);

        let (pdb, _) = load_model(file.path()).unwrap();
        let chain = pdb.chains().next().unwrap();
        assert_eq!(chain.pdb_seq(), "MCW");

        let ca = chain.ca_positions();
        assert_eq!(ca.len(), 3);
        assert!((point_dist(&ca[&1], &ca[&3]) - 7.6).abs() < 1e-3);
    }
}
