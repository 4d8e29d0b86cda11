//! Per-genome duplicate evidence
//!
//! Every hit whose identity and score ratio pass the thresholds is evidence
//! that its cluster is present in the genome. The count of such hits becomes
//! the genome's matrix column; the raw bit scores feed paralog
//! classification.

use crate::bio::blast_tab::HitReader;
use crate::core::clusters::ClusterUniverse;
use crate::core::reference::ReferenceScores;
use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Evidence thresholds applied to each hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountThresholds {
    /// Minimum percent identity of a hit
    pub min_hlog: f64,
    /// Minimum ratio of hit bit score to the query's self score
    pub length: f64,
}

impl Default for CountThresholds {
    fn default() -> Self {
        Self {
            min_hlog: -1.0,
            length: 0.7,
        }
    }
}

impl CountThresholds {
    pub fn passes(&self, percent_identity: f64, ratio: f64) -> bool {
        percent_identity >= self.min_hlog && ratio >= self.length
    }
}

/// Qualifying bit scores per cluster for one genome
#[derive(Debug, Clone, PartialEq)]
pub struct GenomeEvidence {
    pub label: String,
    pub scores: IndexMap<String, Vec<f64>>,
}

impl GenomeEvidence {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            scores: IndexMap::new(),
        }
    }

    pub fn record(&mut self, cluster: &str, bit_score: f64) {
        self.scores
            .entry(cluster.to_string())
            .or_default()
            .push(bit_score);
    }

    /// Qualifying hit count per cluster in universe order, 0 when absent
    pub fn counts(&self, universe: &ClusterUniverse) -> Vec<usize> {
        universe
            .ids()
            .map(|id| self.scores.get(id).map_or(0, Vec::len))
            .collect()
    }

    pub fn count_column(&self, universe: &ClusterUniverse) -> Vec<f64> {
        self.counts(universe).into_iter().map(|c| c as f64).collect()
    }

    /// Write `<label>.counts.txt`: the label, then one count per cluster
    pub fn write_counts(&self, dir: &Path, universe: &ClusterUniverse) -> Result<PathBuf> {
        let path = crate::core::naming::counts_path(dir, &self.label);
        let mut writer = BufWriter::new(File::create(&path)?);
        writeln!(writer, "{}", self.label)?;
        for count in self.counts(universe) {
            writeln!(writer, "{}", count)?;
        }
        writer.flush()?;
        Ok(path)
    }
}

/// Collect qualifying hits of one genome's alignment file.
///
/// A query without a reference score aborts: the file was aligned against a
/// different cluster set. Queries outside the universe are kept in the score
/// lists but never reach a matrix column.
pub fn build_evidence(
    path: &Path,
    label: &str,
    refs: &ReferenceScores,
    universe: &ClusterUniverse,
    thresholds: &CountThresholds,
) -> Result<GenomeEvidence> {
    let mut evidence = GenomeEvidence::new(label);
    let mut reader = HitReader::open(path)?;

    while let Some(hit) = reader.read_next()? {
        let self_score = refs.score(&hit.query_id, path)?;
        let ratio = hit.bit_score / self_score;
        if !thresholds.passes(hit.percent_identity, ratio) {
            continue;
        }
        if !universe.contains(&hit.query_id) {
            tracing::debug!(
                "{}: query {} is not in the cluster universe",
                path.display(),
                hit.query_id
            );
        }
        evidence.record(&hit.query_id, hit.bit_score);
    }

    tracing::debug!(
        "{}: {} clusters with qualifying hits",
        label,
        evidence.scores.len()
    );
    Ok(evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BsrError;
    use rstest::rstest;
    use tempfile::TempDir;

    fn line(query: &str, subject: &str, ident: f64, bit: f64) -> String {
        format!(
            "{}\t{}\t{}\t100\t0\t0\t1\t100\t1\t100\t1e-20\t{}\n",
            query, subject, ident, bit
        )
    }

    fn refs() -> ReferenceScores {
        let mut map = IndexMap::new();
        map.insert("c1".to_string(), 100.0);
        map.insert("c2".to_string(), 200.0);
        map.insert("c3".to_string(), 50.0);
        ReferenceScores::from_map(map)
    }

    #[rstest]
    #[case(99.0, 0.7, true)]
    #[case(99.0, 0.69, false)]
    #[case(-1.0, 0.9, true)]
    #[case(-1.5, 0.9, false)]
    fn test_threshold_boundaries(#[case] ident: f64, #[case] ratio: f64, #[case] expected: bool) {
        let thresholds = CountThresholds::default();
        assert_eq!(thresholds.passes(ident, ratio), expected);
    }

    #[test]
    fn test_build_evidence_counts_and_scores() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("g1.fasta.new_blast.out");
        let data = [
            line("c1", "contig1", 99.0, 95.0),
            line("c1", "contig7", 90.0, 80.0),
            line("c1", "contig9", 80.0, 10.0),
            line("c2", "contig2", 99.0, 190.0),
        ]
        .concat();
        std::fs::write(&path, data).unwrap();

        let universe = ClusterUniverse::from_ids(["c1", "c2", "c3"]).unwrap();
        let evidence =
            build_evidence(&path, "g1", &refs(), &universe, &CountThresholds::default()).unwrap();

        assert_eq!(evidence.label, "g1");
        assert_eq!(evidence.scores["c1"], vec![95.0, 80.0]);
        assert_eq!(evidence.counts(&universe), vec![2, 1, 0]);
        assert_eq!(evidence.count_column(&universe), vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_missing_reference_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("g1.fasta.new_blast.out");
        std::fs::write(&path, line("c9", "contig1", 99.0, 95.0)).unwrap();

        let universe = ClusterUniverse::from_ids(["c1"]).unwrap();
        let err = build_evidence(&path, "g1", &refs(), &universe, &CountThresholds::default())
            .unwrap_err();
        assert!(err.is_run_fatal());
        assert!(matches!(err, BsrError::MissingReferenceScore { ref query_id, .. } if query_id == "c9"));
    }

    #[test]
    fn test_write_counts_file() {
        let dir = TempDir::new().unwrap();
        let universe = ClusterUniverse::from_ids(["c1", "c2"]).unwrap();
        let mut evidence = GenomeEvidence::new("K12");
        evidence.record("c2", 40.0);
        evidence.record("c2", 38.0);

        let path = evidence.write_counts(dir.path(), &universe).unwrap();
        assert!(path.ends_with("K12.counts.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "K12\n0\n2\n");
    }
}
