use super::resolve_input;
use clap::Parser;
use metaprot::fasta::{write_all, write_error_log};
use metaprot::gpr::{
    complexes_to_df, monomers_to_df, process_rules, read_rules, reports_to_df, IdPattern,
    DEFAULT_ID_PATTERN, DEFAULT_RULE_COLUMN,
};
use metaprot::{write_df_to_file, DataFrameFileType, IdCache};
use std::path::PathBuf;
use tracing::{debug, error, info, trace, warn};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Tab-separated table of the metabolic model
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Column holding the gene-reaction rules
    #[arg(short, long, default_value_t = String::from(DEFAULT_RULE_COLUMN))]
    column: String,

    /// Regular expression matching a whole gene identifier
    #[arg(long = "id-pattern", default_value_t = String::from(DEFAULT_ID_PATTERN))]
    id_pattern: String,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// JSON cache of identifier accessions and sequences. Enables FASTA output
    #[arg(long)]
    cache: Option<PathBuf>,

    /// FASTA file whose records are added to the cache before writing FASTA files.
    /// Headers are `>identifier [accession]`
    #[arg(long)]
    sequences: Option<PathBuf>,

    /// Directory for complex FASTA files, relative to the output directory
    #[arg(long = "complex-dir", default_value_t = String::from("Complex_fastas"))]
    complex_dir: String,

    /// Directory for monomer FASTA files, relative to the output directory
    #[arg(long = "monomer-dir", default_value_t = String::from("Monomers_to_model"))]
    monomer_dir: String,

    /// File listing the identifiers without a sequence, relative to the output directory
    #[arg(long = "error-log", default_value_t = String::from("err_MetabProc.txt"))]
    error_log: String,
}

pub(crate) fn run(args: &Args) {
    trace!("{args:?}");

    let Some(input_path) = resolve_input(&args.input) else {
        return;
    };
    let output_path = match std::path::absolute(&args.output) {
        Ok(path) => path,
        Err(e) => {
            error!("Failed to resolve the output directory: {e}");
            return;
        }
    };
    if let Err(e) = std::fs::create_dir_all(&output_path) {
        error!("Failed to create {}: {e}", output_path.display());
        return;
    }
    debug!("Results will be saved to {}", output_path.display());

    let pattern = match IdPattern::new(&args.id_pattern) {
        Ok(pattern) => pattern,
        Err(e) => {
            error!("Invalid identifier pattern {:?}: {e}", args.id_pattern);
            return;
        }
    };

    let rules = match read_rules(&input_path, &args.column) {
        Ok(rules) => rules,
        Err(e) => {
            error!("{e}");
            return;
        }
    };
    debug!("Read {} unique rules", rules.len());

    let assemblies = process_rules(&rules, &pattern);
    info!(
        "Found {} monomers and {} complexes in {} rules",
        assemblies.monomers.len(),
        assemblies.complexes.len(),
        rules.len()
    );

    let tables = [
        ("monomers", monomers_to_df(&assemblies)),
        ("complexes", complexes_to_df(&assemblies)),
        ("rules", reports_to_df(&assemblies)),
    ];
    for (name, df) in tables {
        let written = df.and_then(|mut df| {
            debug!("{name}\n{df}");
            write_df_to_file(&mut df, &output_path.join(name), args.output_format)
        });
        match written {
            Ok(path) => info!("Saved {name} to {}", path.display()),
            Err(e) => error!("Failed to save {name}: {e}"),
        }
    }

    let Some(cache_path) = &args.cache else {
        return;
    };
    let mut cache = match IdCache::load(cache_path) {
        Ok(cache) => cache,
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    if let Some(fasta) = &args.sequences {
        match std::fs::read_to_string(fasta) {
            Ok(text) => {
                let n = cache.import_fasta(&text);
                info!("Imported {n} sequences from {}", fasta.display());
            }
            Err(e) => warn!("Failed to read {}: {e}", fasta.display()),
        }
    }

    let report = write_all(
        &assemblies.complexes,
        &assemblies.monomers,
        &cache,
        &output_path.join(&args.complex_dir),
        &output_path.join(&args.monomer_dir),
    );
    match report {
        Ok(report) => {
            info!(
                "Wrote {} FASTA files ({} already present, {} missing)",
                report.written.len(),
                report.existing,
                report.missing.len()
            );
            let log_path = output_path.join(&args.error_log);
            if let Err(e) = write_error_log(&log_path, &report.missing) {
                error!("{e}");
            }
        }
        Err(e) => error!("Failed to write FASTA files: {e}"),
    }

    if let Err(e) = cache.save(cache_path) {
        error!("{e}");
    }
}
