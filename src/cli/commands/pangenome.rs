use crate::cli::commands::filter::read_matrix;
use crate::cli::output::{section_header_with_line, written_files};
use crate::core::config::Config;
use crate::core::pangenome::{simulate, CurveKind};
use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Args)]
pub struct PangenomeArgs {
    #[arg(short, long, value_name = "FILE")]
    pub matrix: PathBuf,

    /// Curve to simulate (acc, core, uni, all)
    #[arg(short, long, default_value = "all")]
    pub kind: CurveKind,

    #[arg(short, long, default_value = "100")]
    pub iterations: usize,

    /// Presence threshold
    #[arg(short, long)]
    pub upper: Option<f64>,

    /// Seed for reproducible sampling
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(short, long, default_value = "pangenome")]
    pub prefix: String,

    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

pub fn run(args: PangenomeArgs, config: Config) -> anyhow::Result<()> {
    let upper = args.upper.unwrap_or(config.matrix.upper);
    let matrix = read_matrix(&args.matrix)?;
    std::fs::create_dir_all(&args.output)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let curves = simulate(&matrix, upper, args.iterations, args.kind, &mut rng);
    let files = curves.write(&args.output, &args.prefix)?;

    section_header_with_line("Pan-genome Simulation");
    written_files(&files);
    Ok(())
}
