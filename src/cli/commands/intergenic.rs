use crate::bio::fasta::{parse_fasta, write_fasta};
use crate::bio::intergenic::{coding_ranges_from_gff, extract_intergenic, intergenic_ranges};
use crate::cli::output::success;
use crate::core::config::Config;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct IntergenicArgs {
    /// Genome FASTA
    #[arg(short, long, value_name = "FILE")]
    pub genome: PathBuf,

    /// Gene predictions in GFF format
    #[arg(long, value_name = "FILE")]
    pub gff: PathBuf,

    /// Regions must be longer than this (defaults to the configured value)
    #[arg(long)]
    pub min_length: Option<usize>,

    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

pub fn run(args: IntergenicArgs, config: Config) -> anyhow::Result<()> {
    let genome = parse_fasta(&args.genome)?;
    let coding = coding_ranges_from_gff(&args.gff)?;
    let regions = intergenic_ranges(&coding);
    let min_length = args.min_length.unwrap_or(config.sequences.min_intergenic_length);

    let sequences = extract_intergenic(&genome, &regions, min_length);
    write_fasta(&args.output, &sequences)?;
    success(&format!(
        "{} of {} intergenic regions written to {}",
        sequences.len(),
        regions.len(),
        args.output.display()
    ));
    Ok(())
}
