//! Pan-genome accumulation curves by random genome subsampling

use crate::core::matrix::BsrMatrix;
use crate::{BsrError, Result};
use rand::seq::index::sample;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurveKind {
    Accumulation,
    Core,
    Uniques,
    All,
}

impl CurveKind {
    fn includes(self, other: CurveKind) -> bool {
        self == CurveKind::All || self == other
    }
}

impl std::str::FromStr for CurveKind {
    type Err = BsrError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "acc" | "accumulation" => Ok(CurveKind::Accumulation),
            "core" => Ok(CurveKind::Core),
            "uni" | "uniques" => Ok(CurveKind::Uniques),
            "all" => Ok(CurveKind::All),
            other => Err(BsrError::InvalidInput(format!(
                "unknown curve type '{}', expected acc, core, uni or all",
                other
            ))),
        }
    }
}

/// Replicate values per sample size
pub type Replicates = BTreeMap<usize, Vec<f64>>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanGenomeCurves {
    pub accumulation: Option<Replicates>,
    pub core: Option<Replicates>,
    pub uniques: Option<Replicates>,
}

/// For every replicate and sample size `i`, draw `i` genomes without
/// replacement and count clusters present (value ≥ `upper`) in at least one
/// (accumulation), all (core) or exactly one (uniques, divided by `i`) of them
pub fn simulate<R: Rng + ?Sized>(
    matrix: &BsrMatrix,
    upper: f64,
    iterations: usize,
    kind: CurveKind,
    rng: &mut R,
) -> PanGenomeCurves {
    let genomes = matrix.n_genomes();
    let mut accumulation = Replicates::new();
    let mut core = Replicates::new();
    let mut uniques = Replicates::new();

    for _ in 0..iterations {
        for size in 1..=genomes {
            let picked = sample(rng, genomes, size).into_vec();
            let (mut any, mut all, mut single) = (0usize, 0usize, 0usize);

            for row in matrix.rows() {
                let present = picked.iter().filter(|&&g| row[g] >= upper).count();
                if present >= 1 {
                    any += 1;
                }
                if present == size {
                    all += 1;
                }
                if present == 1 {
                    single += 1;
                }
            }

            accumulation.entry(size).or_default().push(any as f64);
            core.entry(size).or_default().push(all as f64);
            uniques
                .entry(size)
                .or_default()
                .push(single as f64 / size as f64);
        }
    }

    PanGenomeCurves {
        accumulation: kind.includes(CurveKind::Accumulation).then_some(accumulation),
        core: kind.includes(CurveKind::Core).then_some(core),
        uniques: kind.includes(CurveKind::Uniques).then_some(uniques),
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

impl PanGenomeCurves {
    /// Write `<prefix>_<curve>_replicates.txt` files (`size\tvalue` lines)
    /// and log the mean per sample size
    pub fn write(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (name, curve) in [
            ("accumulation", &self.accumulation),
            ("core", &self.core),
            ("uniques", &self.uniques),
        ] {
            let Some(replicates) = curve else {
                continue;
            };
            let path = dir.join(format!("{}_{}_replicates.txt", prefix, name));
            let mut writer = BufWriter::new(File::create(&path)?);
            tracing::info!("{} means", name);
            for (size, values) in replicates {
                tracing::info!("{}\t{:.2}", size, mean(values));
                for value in values {
                    writeln!(writer, "{}\t{}", size, value)?;
                }
            }
            writer.flush()?;
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn matrix() -> BsrMatrix {
        BsrMatrix::new(
            "",
            strings(&["shared", "only_a", "only_b"]),
            strings(&["a", "b"]),
            vec![vec![1.0, 0.9], vec![0.95, 0.0], vec![0.1, 0.85]],
        )
        .unwrap()
    }

    #[test]
    fn test_full_sample_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let curves = simulate(&matrix(), 0.8, 3, CurveKind::All, &mut rng);

        let acc = curves.accumulation.unwrap();
        assert_eq!(acc[&2], vec![3.0, 3.0, 3.0]);
        assert_eq!(acc[&1].len(), 3);
        assert!(acc[&1].iter().all(|&v| v == 2.0));

        let core = curves.core.unwrap();
        assert_eq!(core[&2], vec![1.0; 3]);

        let uniques = curves.uniques.unwrap();
        assert_eq!(uniques[&2], vec![1.0; 3]);
        assert_eq!(uniques[&1], vec![2.0; 3]);
    }

    #[test]
    fn test_kind_selects_curves() {
        let mut rng = StdRng::seed_from_u64(1);
        let curves = simulate(&matrix(), 0.8, 1, CurveKind::Core, &mut rng);
        assert!(curves.accumulation.is_none());
        assert!(curves.core.is_some());
        assert!(curves.uniques.is_none());
    }

    #[test]
    fn test_same_seed_same_curves() {
        let a = simulate(&matrix(), 0.8, 5, CurveKind::All, &mut StdRng::seed_from_u64(42));
        let b = simulate(&matrix(), 0.8, 5, CurveKind::All, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_write_replicates() {
        let dir = TempDir::new().unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let curves = simulate(&matrix(), 0.8, 2, CurveKind::Accumulation, &mut rng);

        let files = curves.write(dir.path(), "ecoli").unwrap();
        assert_eq!(files, vec![dir.path().join("ecoli_accumulation_replicates.txt")]);
        let text = std::fs::read_to_string(&files[0]).unwrap();
        assert_eq!(text, "1\t2\n1\t2\n2\t3\n2\t3\n");
    }

    #[test]
    fn test_curve_kind_parsing() {
        assert_eq!("acc".parse::<CurveKind>().unwrap(), CurveKind::Accumulation);
        assert_eq!("uni".parse::<CurveKind>().unwrap(), CurveKind::Uniques);
        assert!("pan".parse::<CurveKind>().is_err());
    }
}
