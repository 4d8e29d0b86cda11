use crate::bio::fasta::{filter_by_length, parse_fasta, reject_scaffolds, rename_with_sequence, write_fasta};
use crate::bio::translate::translate_genes;
use crate::cli::output::{section_header_with_line, tree_item, warning, written_files};
use crate::core::config::Config;
use crate::core::naming::IdSequence;
use anyhow::Context;
use clap::Args;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Args)]
pub struct PrepareArgs {
    /// Gene or genome FASTA (gzip accepted)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Minimum record length (defaults to the configured value)
    #[arg(long)]
    pub min_length: Option<usize>,

    /// Drop records containing N
    #[arg(long)]
    pub reject_scaffolds: bool,

    /// Rename records to <PREFIX>_<n> and write the old/new id table next to the output
    #[arg(long, value_name = "PREFIX")]
    pub rename: Option<String>,

    /// Translate genes to peptides (bacterial code)
    #[arg(long)]
    pub translate: bool,
}

pub fn run(args: PrepareArgs, config: Config) -> anyhow::Result<()> {
    let records = parse_fasta(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let total = records.len();
    let min_length = args.min_length.unwrap_or(config.sequences.min_length);

    let mut records = filter_by_length(records, min_length);
    if args.reject_scaffolds {
        records = reject_scaffolds(records)?;
    }

    let mut files = Vec::new();
    if let Some(prefix) = &args.rename {
        let mut ids = IdSequence::new();
        let (renamed, table) = rename_with_sequence(records, prefix, &mut ids);
        records = renamed;

        let table_path = args.output.with_extension("renames.txt");
        let mut writer = BufWriter::new(File::create(&table_path)?);
        for (old, new) in &table {
            writeln!(writer, "{}\t{}", old, new)?;
        }
        writer.flush()?;
        files.push(table_path);
    }

    let mut too_short = 0;
    if args.translate {
        let translated = translate_genes(&records, config.sequences.min_peptide_length);
        too_short = translated.too_short.len();
        records = translated.peptides;
    }

    write_fasta(&args.output, &records)?;
    files.insert(0, args.output.clone());

    section_header_with_line("Sequence Preparation");
    tree_item(false, "Input records", Some(&total.to_string()));
    tree_item(false, "Written records", Some(&records.len().to_string()));
    if too_short > 0 {
        warning(&format!("{} peptide(s) shorter than {} residues dropped", too_short, config.sequences.min_peptide_length));
    }
    written_files(&files);
    Ok(())
}
