//! Rename matrix rows and consensus records after reference locus tags

use crate::bio::blast_tab::AlignmentHit;
use crate::bio::sequence::Sequence;
use crate::core::clusters::ClusterUniverse;
use crate::core::matrix::BsrMatrix;
use crate::core::reducer::keep_best;
use crate::core::reference::ReferenceScores;
use crate::Result;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::Path;

/// Cluster id → locus tag.
///
/// Each locus tag keeps its best hit against the consensus. A hit names its
/// cluster when its score is more than `threshold` percent of the locus tag's
/// self score; if several locus tags name one cluster the best-scoring wins.
pub fn locus_tag_map(
    locus_refs: &ReferenceScores,
    hits: &[AlignmentHit],
    universe: &ClusterUniverse,
    threshold: f64,
    source: &Path,
) -> Result<IndexMap<String, String>> {
    let best_per_locus = keep_best(hits, |hit| hit.query_id.clone(), |hit| hit.bit_score);

    let mut qualifying = Vec::new();
    for hit in best_per_locus.into_values() {
        if !universe.contains(&hit.subject_id) {
            continue;
        }
        let self_score = locus_refs.score(&hit.query_id, source)?;
        if hit.bit_score / self_score * 100.0 > threshold {
            qualifying.push(hit);
        }
    }

    Ok(keep_best(qualifying, |hit| hit.subject_id.clone(), |hit| hit.bit_score)
        .into_iter()
        .map(|(cluster, hit)| (cluster, hit.query_id.clone()))
        .collect())
}

/// Rename rows and sort them by their new name.
///
/// A locus tag that would collide with another row keeps the cluster id.
pub fn annotate_matrix(matrix: &BsrMatrix, names: &IndexMap<String, String>) -> Result<BsrMatrix> {
    let mut taken: HashSet<&str> = matrix.clusters().iter().map(String::as_str).collect();
    let mut renamed: Vec<(String, Vec<f64>)> = Vec::with_capacity(matrix.n_clusters());

    for (cluster, row) in matrix.iter_rows() {
        let name = match names.get(cluster) {
            Some(tag) if tag != cluster && taken.contains(tag.as_str()) => {
                tracing::warn!("Locus tag {} already names a row, keeping {}", tag, cluster);
                cluster.to_string()
            }
            Some(tag) => {
                taken.insert(tag.as_str());
                tag.clone()
            }
            None => cluster.to_string(),
        };
        renamed.push((name, row.to_vec()));
    }
    renamed.sort_by(|a, b| a.0.cmp(&b.0));

    let (clusters, rows) = renamed.into_iter().unzip();
    BsrMatrix::new(matrix.corner(), clusters, matrix.genomes().to_vec(), rows)
}

pub fn annotate_consensus(sequences: &[Sequence], names: &IndexMap<String, String>) -> Vec<Sequence> {
    sequences
        .iter()
        .map(|seq| {
            let mut renamed = seq.clone();
            if let Some(tag) = names.get(&seq.id) {
                renamed.id = tag.clone();
            }
            renamed
        })
        .collect()
}
