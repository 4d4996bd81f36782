use super::resolve_input;
use clap::Parser;
use metaprot::cofactors::{collect_cofactors, save_cofactors, ChebiFormulas};
use metaprot::utils::protein_folders;
use std::path::PathBuf;
use tracing::{debug, error, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Directory with one subfolder per protein holding `{name}_UniProt_Features.json`
    #[arg(short, long)]
    input: PathBuf,

    /// ChEBI chemical data table with `compound_id` and `formula` columns (tsv, optionally gzipped)
    #[arg(short, long)]
    chemicals: PathBuf,

    /// Output JSON file
    #[arg(short, long, default_value = "cofactors.json")]
    output: PathBuf,
}

pub(crate) fn run(args: &Args) {
    trace!("{args:?}");

    let Some(input_path) = resolve_input(&args.input) else {
        return;
    };
    let chebi = match ChebiFormulas::load(&args.chemicals) {
        Ok(chebi) => chebi,
        Err(e) => {
            error!("{e}");
            return;
        }
    };
    debug!("Loaded {} ChEBI formulas", chebi.len());

    let folders = match protein_folders(&input_path) {
        Ok(folders) => folders,
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    let cofactors = collect_cofactors(&folders, &chebi);
    match save_cofactors(&cofactors, &args.output) {
        Ok(()) => info!(
            "Found metal cofactors for {} of {} proteins, saved to {}",
            cofactors.len(),
            folders.len(),
            args.output.display()
        ),
        Err(e) => error!("{e}"),
    }
}
