use super::resolve_input;
use clap::Parser;
use metaprot::cofactors::load_cofactors;
use metaprot::summary::{rows_to_df, summarize_folder};
use metaprot::utils::protein_folders;
use metaprot::{write_df_to_file, DataFrameFileType, IdCache};
use std::path::PathBuf;
use tracing::{debug, error, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Directory with one subfolder per protein
    #[arg(short, long)]
    input: PathBuf,

    /// Output file; the extension is set from the output format
    #[arg(short, long, default_value = "ROS_summary")]
    output: PathBuf,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Tsv)]
    output_format: DataFrameFileType,

    /// File type of the disulfide bond tables
    #[arg(long = "bonds-format", default_value_t = DataFrameFileType::Csv)]
    bonds_format: DataFrameFileType,

    /// JSON cache providing the UniProt accession of each identifier
    #[arg(long)]
    cache: Option<PathBuf>,

    /// JSON file with the cofactors of each protein
    #[arg(long)]
    cofactors: Option<PathBuf>,
}

pub(crate) fn run(args: &Args) {
    trace!("{args:?}");

    let Some(input_path) = resolve_input(&args.input) else {
        return;
    };

    let cache = match args.cache.as_deref().map(IdCache::load).transpose() {
        Ok(cache) => cache,
        Err(e) => {
            error!("{e}");
            return;
        }
    };
    let cofactors = match args.cofactors.as_deref().map(load_cofactors).transpose() {
        Ok(cofactors) => cofactors,
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    let folders = match protein_folders(&input_path) {
        Ok(folders) => folders,
        Err(e) => {
            error!("{e}");
            return;
        }
    };

    let rows: Vec<_> = folders
        .iter()
        .filter_map(|folder| {
            debug!("Processing {}", folder.display());
            summarize_folder(folder, args.bonds_format, cache.as_ref(), cofactors.as_ref())
                .map_err(|e| error!("Skipping {}: {e}", folder.display()))
                .ok()
        })
        .collect();

    let written = rows_to_df(&rows)
        .and_then(|mut df| write_df_to_file(&mut df, &args.output, args.output_format));
    match written {
        Ok(path) => info!("Summary of {} proteins saved to {}", rows.len(), path.display()),
        Err(e) => error!("Failed to save the summary: {e}"),
    }
}
