use crate::cli::commands::filter::read_matrix;
use crate::cli::output::{format_number, section_header_with_line, tree_item, tree_section, written_files};
use crate::core::config::Config;
use crate::core::stats::{core_genome, frequencies, write_frequencies, FREQUENCY_FILE};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct StatsArgs {
    #[arg(short, long, value_name = "FILE")]
    pub matrix: PathBuf,

    /// Presence threshold for core clusters
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Homology threshold for unique clusters
    #[arg(short, long)]
    pub lower: Option<f64>,

    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn run(args: StatsArgs, config: Config) -> anyhow::Result<()> {
    let threshold = args.threshold.unwrap_or(config.matrix.upper);
    let lower = args.lower.unwrap_or(config.matrix.lower);
    let matrix = read_matrix(&args.matrix)?;
    std::fs::create_dir_all(&args.output)?;

    let core = core_genome(&matrix, threshold, lower);
    let (core_path, unique_path) = core.write(&args.output)?;
    let distribution = frequencies(&matrix, threshold);
    let frequency_path = args.output.join(FREQUENCY_FILE);
    write_frequencies(&frequency_path, &distribution)?;

    section_header_with_line("Matrix Statistics");
    tree_item(false, "Clusters", Some(&format_number(matrix.n_clusters())));
    tree_item(false, "Genomes", Some(&format_number(matrix.n_genomes())));
    tree_item(false, "Conserved clusters", Some(&format_number(core.core.len())));
    tree_item(false, "Unique clusters", Some(&format_number(core.uniques.len())));
    tree_item(
        false,
        "Unique clusters per genome",
        Some(&format!("{:.2}", core.uniques_per_genome)),
    );
    let rows: Vec<(String, String)> = distribution
        .iter()
        .map(|(genomes, clusters)| (format!("in {} genome(s)", genomes), format_number(*clusters)))
        .collect();
    let items: Vec<(&str, String)> = rows.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
    tree_section("Frequency distribution", &items, false);
    written_files(&[core_path, unique_path, frequency_path]);
    Ok(())
}
