pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lsbsr",
    version,
    about = "BLAST score ratio matrices and duplicate detection across genomes",
    long_about = "lsbsr turns per-genome tabular alignment results into a BSR matrix of \
                  gene clusters by genomes, flags duplicated and paralogous clusters, and \
                  filters, summarises and annotates existing matrices."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = value from config, all cores by default)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "LSBSR_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the BSR matrix from per-genome alignment results
    Matrix(commands::matrix::MatrixArgs),

    /// Find duplicated and paralogous clusters
    Dups(commands::dups::DupsArgs),

    /// Drop or keep genomes, clusters or conserved rows of a matrix
    Filter {
        #[command(subcommand)]
        command: commands::filter::FilterCommand,
    },

    /// Core genome and frequency statistics
    Stats(commands::stats::StatsArgs),

    /// Compare two groups of genomes
    Compare(commands::compare::CompareArgs),

    /// Simulate pan-genome accumulation curves
    Pangenome(commands::pangenome::PangenomeArgs),

    /// Rename matrix rows after reference locus tags
    Annotate(commands::annotate::AnnotateArgs),

    /// Reshape a matrix
    Transform {
        #[command(subcommand)]
        command: commands::transform::TransformCommand,
    },

    /// Length-filter, rename or translate gene sequences
    Prepare(commands::prepare::PrepareArgs),

    /// Extract intergenic regions from a genome and its gene predictions
    Intergenic(commands::intergenic::IntergenicArgs),
}
