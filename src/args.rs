use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CommandLineOptions {
    /// The parameter file of the run.
    pub parameter_file: Option<PathBuf>,
    /// Resume from a checkpoint instead of reading initial
    /// conditions.
    #[clap(long)]
    pub resume: Option<PathBuf>,
    #[clap(short, long, parse(from_occurrences))]
    pub verbosity: u64,
}
