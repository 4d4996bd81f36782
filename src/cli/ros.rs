use super::resolve_input;
use clap::Parser;
use metaprot::ros::{process_folder, Mode};
use metaprot::utils::{protein_folders, run_with_threads};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{debug, error, info, trace};

#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub(crate) struct Args {
    /// Directory with one subfolder per protein or complex
    #[arg(short, long)]
    input: PathBuf,

    /// Whether the folders hold monomer or multimer predictions
    #[arg(short, long)]
    mode: Mode,

    /// Number of threads to use for parallel processing
    #[arg(short = 'j', long = "num-threads", default_value_t = 0)]
    num_threads: usize,
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

    let scored = run_with_threads(args.num_threads, || {
        folders
            .par_iter()
            .filter(|folder| match process_folder(folder, args.mode) {
                Ok(path) => {
                    debug!("Saved {}", path.display());
                    true
                }
                Err(e) => {
                    error!("{e}");
                    false
                }
            })
            .count()
    });
    info!("Scored {scored} of {} folders", folders.len());
}
