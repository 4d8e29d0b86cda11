pub mod annotate;
pub mod compare;
pub mod dups;
pub mod filter;
pub mod intergenic;
pub mod matrix;
pub mod pangenome;
pub mod prepare;
pub mod stats;
pub mod transform;

use crate::core::clusters::ClusterUniverse;
use crate::core::reference::ReferenceScores;
use anyhow::Context;
use std::path::Path;

/// Cluster universe and self scores every matrix run starts from.
///
/// Duplicate cluster ids surface here, before any genome file is read.
pub(crate) fn load_run_inputs(
    clusters: &Path,
    self_alignment: &Path,
) -> anyhow::Result<(ClusterUniverse, ReferenceScores)> {
    let universe = ClusterUniverse::from_fasta(clusters)
        .with_context(|| format!("Failed to load clusters from {}", clusters.display()))?;
    let refs = ReferenceScores::from_self_alignment(self_alignment).with_context(|| {
        format!("Failed to read self alignment {}", self_alignment.display())
    })?;
    tracing::info!(
        "{} clusters, {} reference scores",
        universe.len(),
        refs.len()
    );
    Ok((universe, refs))
}
