use crate::bio::blast_tab::read_hits;
use crate::bio::fasta::{parse_fasta, write_fasta};
use crate::cli::commands::filter::read_matrix;
use crate::cli::output::{section_header_with_line, tree_item, written_files};
use crate::core::annotate::{annotate_consensus, annotate_matrix, locus_tag_map};
use crate::core::clusters::ClusterUniverse;
use crate::core::config::Config;
use crate::core::reference::ReferenceScores;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct AnnotateArgs {
    #[arg(short, long, value_name = "FILE")]
    pub matrix: PathBuf,

    /// Consensus FASTA the matrix was built from
    #[arg(short = 'C', long, value_name = "FILE")]
    pub clusters: PathBuf,

    /// Alignment of the locus tag sequences against themselves
    #[arg(short, long, value_name = "FILE")]
    pub self_alignment: PathBuf,

    /// Alignment of the locus tag sequences against the consensus
    #[arg(long, value_name = "FILE")]
    pub hits: PathBuf,

    /// Minimum percent of the locus tag's self score
    #[arg(short, long, default_value = "80")]
    pub threshold: f64,

    #[arg(short, long, default_value = "annotated")]
    pub prefix: String,

    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn run(args: AnnotateArgs, _config: Config) -> anyhow::Result<()> {
    let matrix = read_matrix(&args.matrix)?;
    let consensus = parse_fasta(&args.clusters)?;
    let universe = ClusterUniverse::from_ids(consensus.iter().map(|s| s.id.clone()))?;
    let locus_refs = ReferenceScores::from_self_alignment(&args.self_alignment)?;
    let hits = read_hits(&args.hits)?;
    std::fs::create_dir_all(&args.output)?;

    let names = locus_tag_map(&locus_refs, &hits, &universe, args.threshold, &args.hits)?;

    let matrix_path = args.output.join("bsr_matrix_annotated.txt");
    annotate_matrix(&matrix, &names)?.write(&matrix_path)?;
    let fasta_path = args
        .output
        .join(format!("{}.consensus_annotated.fasta", args.prefix));
    write_fasta(&fasta_path, &annotate_consensus(&consensus, &names))?;

    section_header_with_line("Annotation");
    tree_item(false, "Clusters annotated", Some(&format!("{} of {}", names.len(), universe.len())));
    written_files(&[matrix_path, fasta_path]);
    Ok(())
}
