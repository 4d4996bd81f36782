use crate::error::{Error, Result};
use crate::residues::ResidueExt;
use pdbtbx::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Open an atomic data file with [`pdbtbx::ReadOptions`] and remove waters and
/// other non-protein residues.
///
/// # Arguments
///
/// * `input_file` - Path to a PDB or mmCIF file
///
/// # Returns
///
/// The structure and the non-fatal problems found while reading it. Fails with
/// [`Error::Structure`] when the file cannot be parsed at all.
pub fn load_model(input_file: &Path) -> Result<(PDB, Vec<PDBError>)> {
    let path_str = input_file.to_string_lossy().to_string();
    let (mut pdb, errors) = pdbtbx::ReadOptions::default()
        .set_only_atomic_coords(true)
        .set_level(pdbtbx::StrictnessLevel::Loose)
        .read(&path_str)
        .map_err(|errors| Error::Structure {
            path: input_file.to_path_buf(),
            details: errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; "),
        })?;

    // Remove non-protein residues from model
    pdb.remove_residues_by(|res| res.resn().map_or(true, |code| code == "O"));

    Ok((pdb, errors))
}

/// Report the non-fatal problems found while reading a structure.
pub fn log_pdb_warnings(warnings: &[PDBError]) {
    for e in warnings {
        match e.level() {
            pdbtbx::ErrorLevel::BreakingError => error!("{e}"),
            pdbtbx::ErrorLevel::InvalidatingError => error!("{e}"),
            _ => warn!("{e}"),
        }
    }
}

/// Run `op` on a dedicated rayon pool.
///
/// - 0 means use all available cores
/// - n > 0 means use n threads
///
/// Falls back to the global pool if the dedicated one cannot be built.
///
/// # Arguments
///
/// * `num_threads` - Number of threads (0 for all cores)
/// * `op` - Work to run; parallel iterators inside it use the pool
///
/// # Returns
///
/// Whatever `op` returns.
pub fn run_with_threads<T, F>(num_threads: usize, op: F) -> T
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    match rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
    {
        Ok(pool) => pool.install(op),
        Err(e) => {
            warn!("Failed to build thread pool, using the global one: {e}");
            op()
        }
    }
}

/// Sorted subdirectories of `dir`, one per protein or complex.
pub fn protein_folders(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut folders = std::fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect::<Vec<_>>();
    folders.sort();
    Ok(folders)
}

/// Name of a protein folder, which is also the stem of every file inside it.
pub fn folder_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// `{name}/{name}.pdb`
pub fn structure_path(folder: &Path) -> PathBuf {
    folder.join(format!("{}.pdb", folder_name(folder)))
}

/// UniProt entry of `prot` inside `folder`.
pub fn entry_path(folder: &Path, prot: &str) -> PathBuf {
    folder.join(format!("{prot}_UniProt_Features.json"))
}

/// Write a DataFrame to `file_path`, replacing its extension with the one of `file_type`.
///
/// # Arguments
///
/// * `df` - DataFrame to save
/// * `file_path` - Output path; any extension is replaced
/// * `file_type` - Output format
///
/// # Returns
///
/// The path actually written.
pub fn write_df_to_file(
    df: &mut DataFrame,
    file_path: &Path,
    file_type: DataFrameFileType,
) -> Result<PathBuf> {
    let path = file_path.with_extension(file_type.to_string());
    let mut file = std::fs::File::create(&path).map_err(|e| Error::io(&path, e))?;
    match file_type {
        DataFrameFileType::Csv => {
            CsvWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Tsv => {
            CsvWriter::new(&mut file).with_separator(b'\t').finish(df)?;
        }
        DataFrameFileType::Parquet => {
            ParquetWriter::new(&mut file).finish(df)?;
        }
        DataFrameFileType::Json => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::Json)
                .finish(df)?;
        }
        DataFrameFileType::NDJson => {
            JsonWriter::new(&mut file)
                .with_json_format(JsonFormat::JsonLines)
                .finish(df)?;
        }
    }
    Ok(path)
}

/// Read a DataFrame written by [`write_df_to_file`].
///
/// # Arguments
///
/// * `file_path` - Path as passed to [`write_df_to_file`]; the extension is set from `file_type`
/// * `file_type` - Format the file was written in
///
/// # Returns
///
/// The DataFrame, with column types inferred for text formats.
pub fn read_df_from_file(file_path: &Path, file_type: DataFrameFileType) -> Result<DataFrame> {
    let path = file_path.with_extension(file_type.to_string());
    let df = match file_type {
        DataFrameFileType::Csv | DataFrameFileType::Tsv => {
            let separator = match file_type {
                DataFrameFileType::Tsv => b'\t',
                _ => b',',
            };
            CsvReadOptions::default()
                .with_has_header(true)
                .with_parse_options(CsvParseOptions::default().with_separator(separator))
                .try_into_reader_with_file_path(Some(path))?
                .finish()?
        }
        DataFrameFileType::Parquet => {
            let file = std::fs::File::open(&path).map_err(|e| Error::io(&path, e))?;
            ParquetReader::new(file).finish()?
        }
        DataFrameFileType::Json | DataFrameFileType::NDJson => {
            let format = match file_type {
                DataFrameFileType::NDJson => JsonFormat::JsonLines,
                _ => JsonFormat::Json,
            };
            let file = std::fs::File::open(&path).map_err(|e| Error::io(&path, e))?;
            JsonReader::new(file).with_json_format(format).finish()?
        }
    };
    Ok(df)
}

/// Serialize `value` as JSON indented with four spaces.
pub fn to_pretty_json<T: serde::Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// File format for writing DataFrames.
#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum DataFrameFileType {
    /// Comma-separated values
    Csv,
    /// Tab-separated values
    Tsv,
    /// Parquet columnar storage
    Parquet,
    /// Standard JSON
    Json,
    /// Newline-delimited JSON
    NDJson,
}

impl std::fmt::Display for DataFrameFileType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DataFrameFileType::Csv => write!(f, "csv"),
            DataFrameFileType::Tsv => write!(f, "tsv"),
            DataFrameFileType::Parquet => write!(f, "parquet"),
            DataFrameFileType::Json => write!(f, "json"),
            DataFrameFileType::NDJson => write!(f, "ndjson"),
        }
    }
}

/// Minimal PDB files for tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[derive(Debug, Clone)]
    pub(crate) struct FixtureAtom {
        pub chain: char,
        pub resi: isize,
        pub resn: &'static str,
        pub name: &'static str,
        pub pos: [f64; 3],
        pub b_factor: f64,
    }

    pub(crate) fn atom(
        chain: char,
        resi: isize,
        resn: &'static str,
        name: &'static str,
        pos: [f64; 3],
        b_factor: f64,
    ) -> FixtureAtom {
        FixtureAtom {
            chain,
            resi,
            resn,
            name,
            pos,
            b_factor,
        }
    }

    /// Backbone atoms (plus CB, and SG for cysteines) around a CA position.
    pub(crate) fn residue_atoms(
        chain: char,
        resi: isize,
        resn: &'static str,
        ca: [f64; 3],
        b_factor: f64,
    ) -> Vec<FixtureAtom> {
        let at = |name, dx: f64, dy: f64, dz: f64| {
            atom(chain, resi, resn, name, [ca[0] + dx, ca[1] + dy, ca[2] + dz], b_factor)
        };
        let mut atoms = vec![
            at("N", -0.5, 1.3, 0.0),
            at("CA", 0.0, 0.0, 0.0),
            at("C", 1.5, 0.0, 0.0),
            at("O", 2.1, -1.0, 0.0),
        ];
        if resn != "GLY" {
            atoms.push(at("CB", -0.5, -0.8, 1.2));
        }
        if resn == "CYS" {
            atoms.push(at("SG", -0.5, -0.8, 3.0));
        }
        atoms
    }

    fn atom_line(serial: usize, a: &FixtureAtom) -> String {
        let name = if a.name.len() < 4 {
            format!(" {:<3}", a.name)
        } else {
            a.name.to_string()
        };
        let element = &a.name[..1];
        format!(
            "ATOM  {serial:>5} {name:<4} {resn:>3} {chain}{resi:>4}    {x:>8.3}{y:>8.3}{z:>8.3}{occ:>6.2}{b:>6.2}          {element:>2}",
            resn = a.resn,
            chain = a.chain,
            resi = a.resi,
            x = a.pos[0],
            y = a.pos[1],
            z = a.pos[2],
            occ = 1.0,
            b = a.b_factor,
        )
    }

    /// Write `atoms` to a temporary `.pdb` file, preceded by `header` lines.
    pub(crate) fn write_pdb(atoms: &[FixtureAtom], header: &[&str]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".pdb").tempfile().unwrap();
        for line in header {
            writeln!(file, "{line}").unwrap();
        }
        for (i, a) in atoms.iter().enumerate() {
            writeln!(file, "{}", atom_line(i + 1, a)).unwrap();
        }
        writeln!(file, "END").unwrap();
        file.flush().unwrap();
        file
    }
}
