//! Duplicate and paralog classification
//!
//! A cluster hit more than once is a duplicate. A duplicate is also a paralog
//! when any of its copies scores at or below `max_plog` of its best copy; one
//! diverged copy is enough.

use crate::core::clusters::write_id_list;
use crate::core::counts::GenomeEvidence;
use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DUPLICATE_IDS_FILE: &str = "duplicate_ids.txt";
pub const PARALOG_IDS_FILE: &str = "paralog_ids.txt";

/// Which score lists decide duplication
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateScope {
    /// Scores merged across every genome
    #[default]
    Pooled,
    /// A single genome must hold two or more copies
    PerGenome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateReport {
    pub duplicates: Vec<String>,
    pub paralogs: Vec<String>,
}

/// Whether some score sits at or below `max_plog` of the list's best
pub fn has_diverged_copy(scores: &[f64], max_plog: f64) -> bool {
    let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if best <= 0.0 {
        return false;
    }
    scores.iter().any(|&s| s / best <= max_plog)
}

impl DuplicateReport {
    pub fn classify(evidence: &[GenomeEvidence], max_plog: f64, scope: DuplicateScope) -> Self {
        let mut genomes: Vec<&GenomeEvidence> = evidence.iter().collect();
        genomes.sort_by(|a, b| a.label.cmp(&b.label));

        let mut report = Self::default();
        match scope {
            DuplicateScope::Pooled => {
                let mut merged: IndexMap<&str, Vec<f64>> = IndexMap::new();
                for genome in &genomes {
                    for (cluster, scores) in &genome.scores {
                        merged
                            .entry(cluster.as_str())
                            .or_default()
                            .extend_from_slice(scores);
                    }
                }

                for (cluster, scores) in merged {
                    if scores.len() < 2 {
                        continue;
                    }
                    report.duplicates.push(cluster.to_string());
                    if has_diverged_copy(&scores, max_plog) {
                        report.paralogs.push(cluster.to_string());
                    }
                }
            }
            DuplicateScope::PerGenome => {
                let mut flags: IndexMap<&str, bool> = IndexMap::new();
                for genome in &genomes {
                    for (cluster, scores) in &genome.scores {
                        if scores.len() < 2 {
                            continue;
                        }
                        let paralog = flags.entry(cluster.as_str()).or_insert(false);
                        *paralog |= has_diverged_copy(scores, max_plog);
                    }
                }

                for (cluster, paralog) in flags {
                    report.duplicates.push(cluster.to_string());
                    if paralog {
                        report.paralogs.push(cluster.to_string());
                    }
                }
            }
        }

        tracing::info!(
            "{} duplicate cluster(s), {} paralog(s)",
            report.duplicates.len(),
            report.paralogs.len()
        );
        report
    }

    /// Write `duplicate_ids.txt` and `paralog_ids.txt` into `dir`
    pub fn write(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        let duplicates = dir.join(DUPLICATE_IDS_FILE);
        let paralogs = dir.join(PARALOG_IDS_FILE);
        write_id_list(&duplicates, &self.duplicates)?;
        write_id_list(&paralogs, &self.paralogs)?;
        Ok((duplicates, paralogs))
    }

    pub fn is_paralog(&self, cluster: &str) -> bool {
        self.paralogs.iter().any(|p| p == cluster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn genome(label: &str, hits: &[(&str, f64)]) -> GenomeEvidence {
        let mut evidence = GenomeEvidence::new(label);
        for &(cluster, score) in hits {
            evidence.record(cluster, score);
        }
        evidence
    }

    #[rstest]
    #[case(&[50.0, 10.0], 0.3, true)]
    #[case(&[50.0, 40.0], 0.3, false)]
    #[case(&[50.0, 15.0], 0.3, true)]
    #[case(&[100.0, 100.0, 100.0, 20.0], 0.85, true)]
    #[case(&[0.0, 0.0], 0.85, false)]
    fn test_diverged_copy(#[case] scores: &[f64], #[case] max_plog: f64, #[case] expected: bool) {
        assert_eq!(has_diverged_copy(scores, max_plog), expected);
    }

    #[test]
    fn test_pooled_merges_genomes() {
        let evidence = vec![
            genome("g2", &[("c1", 10.0), ("c3", 80.0)]),
            genome("g1", &[("c1", 50.0), ("c2", 70.0)]),
        ];
        let report = DuplicateReport::classify(&evidence, 0.3, DuplicateScope::Pooled);

        assert_eq!(report.duplicates, vec!["c1".to_string()]);
        assert_eq!(report.paralogs, vec!["c1".to_string()]);
        assert!(report.is_paralog("c1"));
    }

    #[test]
    fn test_per_genome_needs_copies_in_one_genome() {
        let evidence = vec![
            genome("g1", &[("c1", 50.0), ("c2", 60.0), ("c2", 55.0)]),
            genome("g2", &[("c1", 45.0)]),
        ];
        let report = DuplicateReport::classify(&evidence, 0.3, DuplicateScope::PerGenome);

        assert_eq!(report.duplicates, vec!["c2".to_string()]);
        assert!(report.paralogs.is_empty());
    }

    #[test]
    fn test_write_lists() {
        let dir = TempDir::new().unwrap();
        let report = DuplicateReport {
            duplicates: vec!["c1".to_string(), "c4".to_string()],
            paralogs: vec!["c4".to_string()],
        };
        let (dups, paras) = report.write(dir.path()).unwrap();

        assert_eq!(std::fs::read_to_string(dups).unwrap(), "c1\nc4\n");
        assert_eq!(std::fs::read_to_string(paras).unwrap(), "c4\n");
    }
}
