//! # metaprot
//!
//! Tools for turning a genome-scale metabolic model into a set of proteins to
//! model structurally, and for analysing the resulting structures.
//!
//! * [`gpr`] parses the gene-reaction rules of a model and enumerates the
//!   monomers and distinct protein complexes they describe.
//! * [`cache`] and [`fasta`] hold identifier sequences and write FASTA inputs
//!   for structure prediction.
//! * [`disulfide`], [`ros`] and [`summary`] analyse predicted or experimental
//!   structures together with their UniProt annotations; [`cofactors`]
//!   cross-references annotated cofactors with ChEBI formulas.
//!
//! Tabular results are Polars DataFrames, written with [`write_df_to_file`].

pub mod cache;
pub mod chains;
pub mod cofactors;
pub mod disulfide;
pub mod error;
pub mod fasta;
pub mod gpr;
pub mod residues;
pub mod ros;
pub mod summary;
pub mod uniprot;
pub mod utils;

pub use cache::{CacheEntry, IdCache};
pub use chains::ChainExt;
pub use error::{Error, Result};
pub use gpr::{process_rules, Assemblies, Complex, ComplexCollection, GeneId, IdPattern};
pub use residues::ResidueExt;
pub use uniprot::UniProtEntry;
pub use utils::{load_model, read_df_from_file, write_df_to_file, DataFrameFileType};
