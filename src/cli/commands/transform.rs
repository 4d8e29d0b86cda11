use crate::cli::commands::filter::read_matrix;
use crate::cli::output::success;
use crate::core::clusters::read_id_list;
use crate::core::config::Config;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum TransformCommand {
    /// Swap clusters and genomes
    Transpose(TransposeArgs),

    /// Write a 1/- presence matrix
    Presence(PresenceArgs),

    /// Order rows after a list of cluster ids
    Reorder(ReorderArgs),
}

#[derive(Args)]
pub struct TransposeArgs {
    #[arg(short, long, value_name = "FILE")]
    pub matrix: PathBuf,

    #[arg(short, long, default_value = "transposed_matrix.txt")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct PresenceArgs {
    #[arg(short, long, value_name = "FILE")]
    pub matrix: PathBuf,

    /// Values at or above this are present (defaults to the configured lower bound)
    #[arg(short, long)]
    pub lower: Option<f64>,

    #[arg(short, long, default_value = "panGP_matrix.txt")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct ReorderArgs {
    #[arg(short, long, value_name = "FILE")]
    pub matrix: PathBuf,

    /// Cluster ids in the wanted order, one per line
    #[arg(short, long, value_name = "FILE")]
    pub names: PathBuf,

    #[arg(short, long, default_value = "reordered_matrix.txt")]
    pub output: PathBuf,
}

pub fn run(command: TransformCommand, config: Config) -> anyhow::Result<()> {
    let output = match command {
        TransformCommand::Transpose(args) => {
            read_matrix(&args.matrix)?.transpose().write(&args.output)?;
            args.output
        }
        TransformCommand::Presence(args) => {
            let lower = args.lower.unwrap_or(config.matrix.lower);
            read_matrix(&args.matrix)?.write_presence(&args.output, lower)?;
            args.output
        }
        TransformCommand::Reorder(args) => {
            let names = read_id_list(&args.names)?;
            read_matrix(&args.matrix)?
                .reorder_clusters(&names)
                .write(&args.output)?;
            args.output
        }
    };
    success(&format!("Wrote {}", output.display()));
    Ok(())
}
