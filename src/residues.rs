use nalgebra as na;
use pdbtbx::*;

/// Coordinates of an atom as a vector.
pub fn atom_vec(atom: &Atom) -> na::Vector3<f64> {
    let (x, y, z) = atom.pos();
    na::Vector3::new(x, y, z)
}

/// Dihedral angle in degrees, in `(-180, 180]`, defined by four points.
pub fn dihedral(
    p0: &na::Vector3<f64>,
    p1: &na::Vector3<f64>,
    p2: &na::Vector3<f64>,
    p3: &na::Vector3<f64>,
) -> f64 {
    let b1 = p1 - p0;
    let b2 = p2 - p1;
    let b3 = p3 - p2;

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let y = b2.norm() * b1.dot(&n2);
    let x = n1.dot(&n2);
    y.atan2(x).to_degrees()
}

pub trait ResidueExt {
    /// The residue one-letter code, or `None` if it's not an amino acid.
    fn resn(&self) -> Option<&str>;

    /// The first atom with the given name.
    fn atom_named(&self, name: &str) -> Option<&Atom>;

    fn is_cysteine(&self) -> bool;
}

impl ResidueExt for Residue {
    fn resn(&self) -> Option<&str> {
        let aa_code = match self.name()?.to_uppercase().as_str() {
            "ALA" => "A",
            "ARG" => "R",
            "ASN" => "N",
            "ASP" => "D",
            "CYS" => "C",
            "GLN" => "Q",
            "GLU" => "E",
            "GLY" => "G",
            "HIS" => "H",
            "ILE" => "I",
            "LEU" => "L",
            "LYS" => "K",
            "MET" => "M",
            "PHE" => "F",
            "PRO" => "P",
            "SER" => "S",
            "THR" => "T",
            "TRP" => "W",
            "TYR" => "Y",
            "VAL" => "V",
            "HOH" => "O", // water
            _ => "X",
        };

        match aa_code {
            "X" => None,
            _ => Some(aa_code),
        }
    }

    fn atom_named(&self, name: &str) -> Option<&Atom> {
        self.atoms().find(|atom| atom.name() == name)
    }

    fn is_cysteine(&self) -> bool {
        self.name()
            .is_some_and(|name| name.eq_ignore_ascii_case("CYS"))
    }
}
