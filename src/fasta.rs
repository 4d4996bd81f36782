//! FASTA inputs for structure prediction, built from cached sequences.

use crate::cache::IdCache;
use crate::error::{Error, Result};
use crate::gpr::{ComplexCollection, GeneId, MonomerSet};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastaReport {
    /// Files created in this run
    pub written: Vec<PathBuf>,
    /// Files left untouched because they already exist
    pub existing: usize,
    /// One message per entry that could not be written
    pub missing: Vec<String>,
}

impl FastaReport {
    fn merge(&mut self, other: FastaReport) {
        self.written.extend(other.written);
        self.existing += other.existing;
        self.missing.extend(other.missing);
    }
}

/// Render one record per `(header, sequence)` pair.
pub fn to_fasta<'a>(records: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut out = String::new();
    for (header, seq) in records {
        let _ = writeln!(out, ">{header}\n{seq}");
    }
    out
}

fn header_of<'a>(cache: &'a IdCache, id: &'a GeneId) -> &'a str {
    cache.accession(id.as_str()).unwrap_or(id.as_str())
}

/// Write a multi-FASTA file per complex into `dir`.
///
/// A complex is written only when every subunit has a cached sequence.
pub fn write_complex_fastas(
    complexes: &ComplexCollection,
    cache: &IdCache,
    dir: &Path,
) -> Result<FastaReport> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let mut report = FastaReport::default();

    for complex in complexes.iter() {
        let path = dir.join(format!("{}.fasta", complex.name()));
        if path.exists() {
            debug!("File {} already exists", path.display());
            report.existing += 1;
            continue;
        }

        let records: Option<Vec<(&str, &str)>> = complex
            .members()
            .iter()
            .map(|id| match cache.lookup(id.as_str()) {
                Some(seq) => Some((header_of(cache, id), seq)),
                None => {
                    report
                        .missing
                        .push(format!("No information for protein {id} found"));
                    None
                }
            })
            .collect();

        match records {
            Some(records) => {
                std::fs::write(&path, to_fasta(records)).map_err(|e| Error::io(&path, e))?;
                report.written.push(path);
            }
            None => warn!("{}.fasta file could not be written", complex.name()),
        }
    }

    Ok(report)
}

/// Write one FASTA file per monomer with a cached sequence into `dir`.
pub fn write_monomer_fastas(
    monomers: &MonomerSet,
    cache: &IdCache,
    dir: &Path,
) -> Result<FastaReport> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let mut report = FastaReport::default();

    for id in monomers.iter() {
        let path = dir.join(format!("{id}.fasta"));
        if path.exists() {
            debug!("File {} already exists", path.display());
            report.existing += 1;
            continue;
        }

        match cache.lookup(id.as_str()) {
            Some(seq) => {
                let text = to_fasta([(header_of(cache, id), seq)]);
                std::fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
                report.written.push(path);
            }
            None => report
                .missing
                .push(format!("No sequence found for protein {id}")),
        }
    }

    Ok(report)
}

/// Write FASTA files for every complex and monomer, returning the combined report.
pub fn write_all(
    complexes: &ComplexCollection,
    monomers: &MonomerSet,
    cache: &IdCache,
    complex_dir: &Path,
    monomer_dir: &Path,
) -> Result<FastaReport> {
    let mut report = write_complex_fastas(complexes, cache, complex_dir)?;
    report.merge(write_monomer_fastas(monomers, cache, monomer_dir)?);
    Ok(report)
}

/// Write one message per line.
pub fn write_error_log(path: &Path, messages: &[String]) -> Result<()> {
    let mut text = messages.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }
    std::fs::write(path, text).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpr::{process_rules, IdPattern};

    #[test]
    fn complexes_need_every_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let assemblies = process_rules(
            ["(PP_0001 and PP_0002) or (PP_0001 and PP_0003)"],
            &IdPattern::default(),
        );

        let mut cache = IdCache::new();
        cache.store("PP_0001", "MKT");
        cache.store_accession("PP_0001", "Q88QZ0");
        cache.store("PP_0002", "MAV");

        let report = write_complex_fastas(&assemblies.complexes, &cache, dir.path()).unwrap();
        assert_eq!(report.written, vec![dir.path().join("PP_0001-PP_0002.fasta")]);
        assert_eq!(
            report.missing,
            vec!["No information for protein PP_0003 found".to_string()]
        );

        let text = std::fs::read_to_string(dir.path().join("PP_0001-PP_0002.fasta")).unwrap();
        assert_eq!(text, ">Q88QZ0\nMKT\n>PP_0002\nMAV\n");

        // Second run leaves existing files alone
        let report = write_complex_fastas(&assemblies.complexes, &cache, dir.path()).unwrap();
        assert!(report.written.is_empty());
        assert_eq!(report.existing, 1);
    }

    #[test]
    fn monomers_and_error_log() {
        let dir = tempfile::tempdir().unwrap();
        let assemblies = process_rules(["PP_0001 or PP_0002"], &IdPattern::default());

        let mut cache = IdCache::new();
        cache.store("PP_0002", "MAV");

        let report = write_all(
            &assemblies.complexes,
            &assemblies.monomers,
            &cache,
            &dir.path().join("Complex_fastas"),
            &dir.path().join("Monomers_to_model"),
        )
        .unwrap();
        assert_eq!(report.written.len(), 1);
        assert_eq!(report.missing.len(), 1);

        let log = dir.path().join("err_MetabProc.txt");
        write_error_log(&log, &report.missing).unwrap();
        assert_eq!(
            std::fs::read_to_string(log).unwrap(),
            "No sequence found for protein PP_0001\n"
        );
    }
}
