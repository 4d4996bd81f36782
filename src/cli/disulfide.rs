use super::resolve_input;
use clap::Parser;
use metaprot::disulfide::{process_folder, ModelSource};
use metaprot::utils::{protein_folders, run_with_threads};
use metaprot::DataFrameFileType;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, error, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Directory with one subfolder per protein holding `{name}.pdb`
    #[arg(short, long)]
    input: PathBuf,

    /// Origin of the structures; `auto` reads it from each file header
    #[arg(short, long, default_value = "auto")]
    source: SourceArg,

    /// Output file type
    #[arg(short = 't', long, default_value_t = DataFrameFileType::Csv)]
    output_format: DataFrameFileType,

    /// Number of threads to use for parallel processing
    #[arg(short = 'j', long = "num-threads", default_value_t = 0)]
    num_threads: usize,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SourceArg {
    Auto,
    #[value(name = "alphafold")]
    AlphaFold,
    SwissModel,
    Experimental,
}

impl SourceArg {
    fn model_source(self) -> Option<ModelSource> {
        match self {
            SourceArg::Auto => None,
            SourceArg::AlphaFold => Some(ModelSource::AlphaFold),
            SourceArg::SwissModel => Some(ModelSource::SwissModel),
            SourceArg::Experimental => Some(ModelSource::Experimental),
        }
    }
}

pub(crate) fn run(args: &Args) {
    trace!("{args:?}");

    let Some(input_path) = resolve_input(&args.input) else {
        return;
    };
    let folders = match protein_folders(&input_path) {
        Ok(folders) => folders,
        Err(e) => {
            error!("{e}");
            return;
        }
    };
    debug!("Found {} protein folders", folders.len());

    let source = args.source.model_source();
    let written = run_with_threads(args.num_threads, || {
        folders
            .par_iter()
            .filter_map(|folder| match process_folder(folder, source, args.output_format) {
                Ok(Some(path)) => {
                    debug!("Saved {}", path.display());
                    Some(path)
                }
                Ok(None) => None,
                Err(e) => {
                    error!("{e}");
                    None
                }
            })
            .count()
    });
    info!("Wrote disulfide bonds for {written} of {} proteins", folders.len());
}
