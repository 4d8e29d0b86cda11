use crate::cli::output::success;
use crate::core::clusters::read_id_list;
use crate::core::config::Config;
use crate::core::matrix::BsrMatrix;
use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum FilterCommand {
    /// Keep (or drop) the genomes listed in a file
    Genomes(GenomesArgs),

    /// Drop the clusters listed in a file, e.g. paralog_ids.txt
    Clusters(ClustersArgs),

    /// Keep only clusters missing from some genomes
    Variome(VariomeArgs),
}

#[derive(Args)]
pub struct GenomesArgs {
    #[arg(short, long, value_name = "FILE")]
    pub matrix: PathBuf,

    /// One genome label per line
    #[arg(short, long, value_name = "FILE")]
    pub genomes: PathBuf,

    /// Drop the listed genomes instead of keeping them
    #[arg(long)]
    pub remove: bool,

    #[arg(short, long, default_value = "filtered_genomes.matrix")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct ClustersArgs {
    #[arg(short, long, value_name = "FILE")]
    pub matrix: PathBuf,

    /// One cluster id per line
    #[arg(short, long, value_name = "FILE")]
    pub ids: PathBuf,

    #[arg(short, long, default_value = "bsr_matrix_values_filtered.txt")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct VariomeArgs {
    #[arg(short, long, value_name = "FILE")]
    pub matrix: PathBuf,

    /// Presence threshold (defaults to the configured upper bound)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Number of genomes a cluster may be missing from and still count as conserved
    #[arg(short, long, default_value = "0")]
    pub step: usize,

    #[arg(short, long, default_value = "variome_BSR_matrix")]
    pub output: PathBuf,
}

pub fn run(command: FilterCommand, config: Config) -> anyhow::Result<()> {
    match command {
        FilterCommand::Genomes(args) => {
            let matrix = read_matrix(&args.matrix)?;
            let names = read_id_list(&args.genomes)?;
            let filtered = if args.remove {
                matrix.remove_genomes(&names)
            } else {
                matrix.select_genomes(&names)?
            };
            filtered.write(&args.output)?;
            success(&format!(
                "{} of {} genomes written to {}",
                filtered.n_genomes(),
                matrix.n_genomes(),
                args.output.display()
            ));
        }
        FilterCommand::Clusters(args) => {
            let matrix = read_matrix(&args.matrix)?;
            let ids = read_id_list(&args.ids)?;
            let filtered = matrix.remove_clusters(&ids);
            filtered.write(&args.output)?;
            success(&format!(
                "{} clusters removed, {} written to {}",
                matrix.n_clusters() - filtered.n_clusters(),
                filtered.n_clusters(),
                args.output.display()
            ));
        }
        FilterCommand::Variome(args) => {
            let matrix = read_matrix(&args.matrix)?;
            let threshold = args.threshold.unwrap_or(config.matrix.upper);
            let variome = matrix.variome(threshold, args.step);
            variome.write(&args.output)?;
            success(&format!(
                "{} variable clusters written to {}",
                variome.n_clusters(),
                args.output.display()
            ));
        }
    }
    Ok(())
}

pub(crate) fn read_matrix(path: &std::path::Path) -> anyhow::Result<BsrMatrix> {
    BsrMatrix::read(path).with_context(|| format!("Failed to read matrix {}", path.display()))
}
