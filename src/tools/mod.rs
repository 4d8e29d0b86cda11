//! External alignment tools

pub mod traits;

pub use traits::Aligner;

use crate::core::executor::{FailurePolicy, FanOut};
use crate::core::naming::GenomeNaming;
use crate::{BsrError, Result};
use std::path::{Path, PathBuf};

/// Align the query set against every genome, one result file per genome.
///
/// Tool failures become `ExternalToolFailure` for the genome that triggered
/// them; `policy` decides whether the run continues without it.
pub fn align_each_genome(
    aligner: &dyn Aligner,
    query: &Path,
    genomes: &[PathBuf],
    out_dir: &Path,
    naming: &GenomeNaming,
    fanout: &FanOut,
    policy: FailurePolicy,
) -> Result<Vec<PathBuf>> {
    tracing::info!("Aligning against {} genome(s) with {}", genomes.len(), aligner.name());

    let results = fanout.run(genomes, policy, aligner.name(), |genome| {
        let output = naming.output_for(genome, out_dir)?;
        aligner
            .align(query, genome, &output)
            .map_err(|e| BsrError::ExternalToolFailure {
                tool: aligner.name().to_string(),
                input: genome.to_path_buf(),
                reason: format!("{:#}", e),
            })?;
        Ok(output)
    })?;

    Ok(results.into_iter().map(|(_, output)| output).collect())
}
