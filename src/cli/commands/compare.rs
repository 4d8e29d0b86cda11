use crate::bio::fasta::{parse_fasta, select_ids, write_fasta};
use crate::cli::commands::filter::read_matrix;
use crate::cli::output::{section_header_with_line, tree_item, written_files};
use crate::core::clusters::read_id_list;
use crate::core::config::Config;
use crate::core::stats::{group_summary, group_uniques, split_groups, write_comparison};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct CompareArgs {
    #[arg(short, long, value_name = "FILE")]
    pub matrix: PathBuf,

    /// Genome labels of the first group, one per line
    #[arg(long, value_name = "FILE")]
    pub group1: PathBuf,

    /// Genome labels of the second group, one per line
    #[arg(long, value_name = "FILE")]
    pub group2: PathBuf,

    /// Consensus FASTA; when given, group-unique sequences are extracted
    #[arg(short = 'C', long, value_name = "FILE")]
    pub clusters: Option<PathBuf>,

    #[arg(short, long)]
    pub upper: Option<f64>,

    #[arg(short, long)]
    pub lower: Option<f64>,

    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn run(args: CompareArgs, config: Config) -> anyhow::Result<()> {
    let upper = args.upper.unwrap_or(config.matrix.upper);
    let lower = args.lower.unwrap_or(config.matrix.lower);
    let matrix = read_matrix(&args.matrix)?;
    let group1 = read_id_list(&args.group1)?;
    let group2 = read_id_list(&args.group2)?;
    std::fs::create_dir_all(&args.output)?;

    let (pruned1, pruned2) = split_groups(&matrix, &group1, &group2)?;
    let mut files = vec![
        args.output.join("group1_pruned.txt"),
        args.output.join("group2_pruned.txt"),
    ];
    pruned1.write(&files[0])?;
    pruned2.write(&files[1])?;

    let summary1 = group_summary(&pruned1, upper, lower);
    let summary2 = group_summary(&pruned2, upper, lower);
    let table = args.output.join("groups_combined.txt");
    write_comparison(&table, &summary1, &summary2)?;
    files.push(table);

    let (only1, only2) = group_uniques(&summary1, &summary2);
    if let Some(clusters) = &args.clusters {
        let consensus = parse_fasta(clusters)?;
        for (name, ids) in [("group1", &only1), ("group2", &only2)] {
            let path = args.output.join(format!("{}_unique_seqs.fasta", name));
            write_fasta(&path, &select_ids(&consensus, ids))?;
            files.push(path);
        }
    }

    section_header_with_line("Group Comparison");
    tree_item(false, "Group 1 genomes", Some(&pruned1.n_genomes().to_string()));
    tree_item(false, "Group 2 genomes", Some(&pruned2.n_genomes().to_string()));
    tree_item(false, "Unique to group 1", Some(&only1.len().to_string()));
    tree_item(false, "Unique to group 2", Some(&only2.len().to_string()));
    written_files(&files);
    Ok(())
}
