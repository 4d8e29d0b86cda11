use crate::cli::output::{section_header_with_line, success, tree_item, written_files};
use crate::core::config::Config;
use crate::core::duplicates::DuplicateScope;
use crate::core::pipeline::{find_duplicates, RunContext};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ScopeArg {
    Pooled,
    PerGenome,
}

impl From<ScopeArg> for DuplicateScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Pooled => DuplicateScope::Pooled,
            ScopeArg::PerGenome => DuplicateScope::PerGenome,
        }
    }
}

#[derive(Args)]
pub struct DupsArgs {
    /// Consensus FASTA defining the clusters
    #[arg(short = 'C', long, value_name = "FILE")]
    pub clusters: PathBuf,

    /// Alignment of the consensus against itself
    #[arg(short, long, value_name = "FILE")]
    pub self_alignment: PathBuf,

    /// Directory holding per-genome alignment results
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Output directory for the duplicate matrix and id lists
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Paralog threshold: copies at or below this fraction of the best copy
    #[arg(long)]
    pub max_plog: Option<f64>,

    /// Minimum percent identity for a hit to count
    #[arg(long, allow_hyphen_values = true)]
    pub min_hlog: Option<f64>,

    /// Minimum hit/self score ratio for a hit to count
    #[arg(long)]
    pub length: Option<f64>,

    /// Which score lists decide duplication
    #[arg(long, value_enum)]
    pub scope: Option<ScopeArg>,
}

pub fn run(args: DupsArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(max_plog) = args.max_plog {
        config.thresholds.max_plog = max_plog;
    }
    if let Some(min_hlog) = args.min_hlog {
        config.thresholds.min_hlog = min_hlog;
    }
    if let Some(length) = args.length {
        config.thresholds.length = length;
    }
    if let Some(scope) = args.scope {
        config.thresholds.duplicate_scope = scope.into();
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
    let outputs = find_duplicates(&ctx)?;

    section_header_with_line("Duplicates");
    tree_item(false, "Duplicated clusters", Some(&outputs.report.duplicates.len().to_string()));
    tree_item(false, "Paralogs", Some(&outputs.report.paralogs.len().to_string()));
    written_files(&outputs.files);
    success("Duplicate search complete");
    Ok(())
}
