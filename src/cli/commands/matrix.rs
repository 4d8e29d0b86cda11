use crate::cli::output::{format_number, section_header_with_line, success, tree_item, written_files};
use crate::core::config::Config;
use crate::core::executor::FailurePolicy;
use crate::core::pipeline::{build_bsr_matrix, RunContext};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct MatrixArgs {
    /// Consensus FASTA defining the clusters
    #[arg(short = 'C', long, value_name = "FILE")]
    pub clusters: PathBuf,

    /// Alignment of the consensus against itself
    #[arg(short, long, value_name = "FILE")]
    pub self_alignment: PathBuf,

    /// Directory holding per-genome alignment results
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Output directory for the joint matrices
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Decimal places in the value matrix
    #[arg(long)]
    pub precision: Option<usize>,

    /// What to do with unreadable result files (abort, skip)
    #[arg(long)]
    pub on_parse_failure: Option<FailurePolicy>,
}

pub fn run(args: MatrixArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(precision) = args.precision {
        config.matrix.precision = precision;
    }
    if let Some(policy) = args.on_parse_failure {
        config.pipeline.on_parse_failure = policy;
    }
    config.validate()?;
    std::fs::create_dir_all(&args.output)?;

    let (universe, refs) = super::load_run_inputs(&args.clusters, &args.self_alignment)?;
    let ctx = RunContext {
        work_dir: &args.dir,
        out_dir: &args.output,
        universe: &universe,
        refs: &refs,
        config: &config,
    };
    let outputs = build_bsr_matrix(&ctx)?;

    section_header_with_line("BSR Matrix");
    tree_item(false, "Clusters", Some(&format_number(outputs.values.n_clusters())));
    tree_item(false, "Genomes", Some(&format_number(outputs.values.n_genomes())));
    written_files(&outputs.files);
    success("Matrix complete");
    Ok(())
}
