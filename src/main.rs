mod cli;

use clap::{Parser, Subcommand};
use tracing::Level;

/// Batch tools for proteome modelling from metabolic models
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity of the program:
    /// -v for info, -vv for debug, and -vvv for trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Enumerate the monomers and complexes of a model's gene-reaction rules
    Gpr(cli::gpr::Args),
    /// Detect disulfide bonds in a folder of structures
    Disulfide(cli::disulfide::Args),
    /// Score the ROS susceptibility of functional sites
    Ros(cli::ros::Args),
    /// List the metal-containing cofactors of each protein
    Cofactors(cli::cofactors::Args),
    /// Merge per-protein results into one summary table
    Summary(cli::summary::Args),
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match &cli.command {
        Commands::Gpr(args) => cli::gpr::run(args),
        Commands::Disulfide(args) => cli::disulfide::run(args),
        Commands::Ros(args) => cli::ros::run(args),
        Commands::Cofactors(args) => cli::cofactors::run(args),
        Commands::Summary(args) => cli::summary::run(args),
    }
}
