//! Core-genome, frequency and group comparison statistics over a BSR matrix

use crate::core::clusters::write_id_list;
use crate::core::matrix::{present_in, BsrMatrix};
use crate::{BsrError, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const CORE_IDS_FILE: &str = "core_gene_ids.txt";
pub const UNIQUE_IDS_FILE: &str = "unique_gene_ids.txt";
pub const FREQUENCY_FILE: &str = "frequency_data.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct CoreGenome {
    /// Clusters at or above the threshold in every genome
    pub core: Vec<String>,
    /// Clusters reaching `lower` in exactly one genome
    pub uniques: Vec<String>,
    pub uniques_per_genome: f64,
}

impl CoreGenome {
    pub fn write(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        let core = dir.join(CORE_IDS_FILE);
        let uniques = dir.join(UNIQUE_IDS_FILE);
        write_id_list(&core, &self.core)?;
        write_id_list(&uniques, &self.uniques)?;
        Ok((core, uniques))
    }
}

pub fn core_genome(matrix: &BsrMatrix, threshold: f64, lower: f64) -> CoreGenome {
    let genomes = matrix.n_genomes();
    let mut core = Vec::new();
    let mut uniques = Vec::new();

    for (cluster, row) in matrix.iter_rows() {
        if genomes > 0 && present_in(row, threshold) == genomes {
            core.push(cluster.to_string());
        }
        if present_in(row, lower) == 1 {
            uniques.push(cluster.to_string());
        }
    }

    let uniques_per_genome = if genomes == 0 {
        0.0
    } else {
        uniques.len() as f64 / genomes as f64
    };
    tracing::info!("# of conserved genes = {}", core.len());
    tracing::info!("# of unique genes = {}", uniques.len());
    tracing::info!("# of unique genes per genome = {:.2}", uniques_per_genome);

    CoreGenome {
        core,
        uniques,
        uniques_per_genome,
    }
}

/// Number of genomes a cluster is present in → number of such clusters
pub fn frequencies(matrix: &BsrMatrix, threshold: f64) -> BTreeMap<usize, usize> {
    let mut distribution = BTreeMap::new();
    for (_, row) in matrix.iter_rows() {
        *distribution.entry(present_in(row, threshold)).or_insert(0) += 1;
    }
    distribution
}

pub fn write_frequencies(path: &Path, distribution: &BTreeMap<usize, usize>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "Frequency distribution:")?;
    for (genomes, clusters) in distribution {
        writeln!(writer, "{}\t{}", genomes, clusters)?;
    }
    writer.flush()?;
    Ok(())
}

/// Two sub-matrices holding the genomes of each group
pub fn split_groups(
    matrix: &BsrMatrix,
    group1: &[String],
    group2: &[String],
) -> Result<(BsrMatrix, BsrMatrix)> {
    if let Some(shared) = group1.iter().find(|g| group2.contains(g)) {
        return Err(BsrError::InvalidInput(format!(
            "genome {} is listed in both groups",
            shared
        )));
    }
    Ok((matrix.select_genomes(group1)?, matrix.select_genomes(group2)?))
}

/// Per-cluster summary of one group of genomes
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub cluster: String,
    pub mean: f64,
    /// Genomes at or above the upper threshold
    pub present: usize,
    pub total: usize,
    /// Genomes at or above the lower threshold
    pub homologs: usize,
}

impl GroupSummary {
    pub fn in_all(&self) -> bool {
        self.total > 0 && self.present == self.total
    }
}

pub fn group_summary(matrix: &BsrMatrix, upper: f64, lower: f64) -> Vec<GroupSummary> {
    matrix
        .iter_rows()
        .map(|(cluster, row)| GroupSummary {
            cluster: cluster.to_string(),
            mean: if row.is_empty() {
                0.0
            } else {
                row.iter().sum::<f64>() / row.len() as f64
            },
            present: present_in(row, upper),
            total: row.len(),
            homologs: present_in(row, lower),
        })
        .collect()
}

/// Side-by-side comparison table of two groups, one cluster per line
pub fn write_comparison(path: &Path, group1: &[GroupSummary], group2: &[GroupSummary]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (a, b) in group1.iter().zip(group2) {
        writeln!(
            writer,
            "{}\t{:.2}\t{}\t{}\t{}\t{:.2}\t{}\t{}\t{}",
            a.cluster, a.mean, a.present, a.total, a.homologs, b.mean, b.present, b.total, b.homologs
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Clusters present in every genome of one group with no homolog in the
/// other, as `(group1 uniques, group2 uniques)`
pub fn group_uniques(group1: &[GroupSummary], group2: &[GroupSummary]) -> (Vec<String>, Vec<String>) {
    let mut first = Vec::new();
    let mut second = Vec::new();
    for (a, b) in group1.iter().zip(group2) {
        if a.in_all() && b.homologs == 0 {
            first.push(a.cluster.clone());
        }
        if b.in_all() && a.homologs == 0 {
            second.push(b.cluster.clone());
        }
    }
    (first, second)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn matrix() -> BsrMatrix {
        BsrMatrix::new(
            "",
            strings(&["core", "solo", "pair", "group_a"]),
            strings(&["a1", "a2", "b1", "b2"]),
            vec![
                vec![0.99, 0.95, 0.9, 0.85],
                vec![0.0, 0.0, 0.9, 0.1],
                vec![0.9, 0.0, 0.9, 0.0],
                vec![0.95, 0.92, 0.2, 0.1],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_core_genome() {
        let stats = core_genome(&matrix(), 0.8, 0.4);
        assert_eq!(stats.core, strings(&["core"]));
        assert_eq!(stats.uniques, strings(&["solo"]));
        assert_eq!(stats.uniques_per_genome, 0.25);
    }

    #[test]
    fn test_frequencies() {
        let dist = frequencies(&matrix(), 0.8);
        assert_eq!(dist.into_iter().collect::<Vec<_>>(), vec![(1, 1), (2, 2), (4, 1)]);
    }

    #[test]
    fn test_frequency_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(FREQUENCY_FILE);
        write_frequencies(&path, &frequencies(&matrix(), 0.8)).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Frequency distribution:\n1\t1\n2\t2\n4\t1\n"
        );
    }

    #[test]
    fn test_group_comparison() {
        let (g1, g2) = split_groups(&matrix(), &strings(&["a1", "a2"]), &strings(&["b1", "b2"])).unwrap();
        let s1 = group_summary(&g1, 0.8, 0.4);
        let s2 = group_summary(&g2, 0.8, 0.4);

        assert_eq!(s1[0].present, 2);
        assert_eq!(s2[1].homologs, 1);
        assert!((s1[3].mean - 0.935).abs() < 1e-9);

        let (only_a, only_b) = group_uniques(&s1, &s2);
        assert_eq!(only_a, strings(&["group_a"]));
        assert!(only_b.is_empty());
    }

    #[test]
    fn test_overlapping_groups_rejected() {
        let err = split_groups(&matrix(), &strings(&["a1", "b1"]), &strings(&["b1"])).unwrap_err();
        assert!(matches!(err, BsrError::InvalidInput(_)));
    }
}
