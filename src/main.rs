use clap::Parser;
use colored::*;
use lsbsr::cli::{Cli, Commands};
use lsbsr::core::config::{load_config, Config};
use lsbsr::BsrError;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // LSBSR_LOG wins; -v raises the default level
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let log_level = std::env::var("LSBSR_LOG").unwrap_or_else(|_| default_level.to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<BsrError>() {
            Some(BsrError::Config(_)) => 2,
            Some(BsrError::Io(_)) => 3,
            Some(BsrError::Parse(_))
            | Some(BsrError::MalformedRecord { .. })
            | Some(BsrError::InvalidFileName { .. }) => 4,
            Some(BsrError::MissingReferenceScore { .. })
            | Some(BsrError::DuplicateClusterId(_))
            | Some(BsrError::DuplicateGenomeLabel(_))
            | Some(BsrError::MatrixShape(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    if cli.threads > 0 {
        config.pipeline.processors = cli.threads;
    }

    if cli.verbose > 0 {
        eprintln!(
            "Using {} threads",
            lsbsr::utils::parallel::resolve_threads(config.pipeline.processors)
        );
    }

    match cli.command {
        Commands::Matrix(args) => lsbsr::cli::commands::matrix::run(args, config),
        Commands::Dups(args) => lsbsr::cli::commands::dups::run(args, config),
        Commands::Filter { command } => lsbsr::cli::commands::filter::run(command, config),
        Commands::Stats(args) => lsbsr::cli::commands::stats::run(args, config),
        Commands::Compare(args) => lsbsr::cli::commands::compare::run(args, config),
        Commands::Pangenome(args) => lsbsr::cli::commands::pangenome::run(args, config),
        Commands::Annotate(args) => lsbsr::cli::commands::annotate::run(args, config),
        Commands::Transform { command } => lsbsr::cli::commands::transform::run(command, config),
        Commands::Prepare(args) => lsbsr::cli::commands::prepare::run(args, config),
        Commands::Intergenic(args) => lsbsr::cli::commands::intergenic::run(args, config),
    }
}
