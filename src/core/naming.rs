//! File naming contract linking alignment result files to matrix columns

use crate::{BsrError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Monotonic counter for generated identifiers.
///
/// Owned by the caller and passed explicitly so numbering is reproducible
/// within a run.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: usize,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: usize) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// How genome result files are found and labelled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeNaming {
    /// Glob (relative to the working directory) selecting result files
    pub pattern: String,
    /// Suffix stripped from a result file name to recover the genome label
    pub suffix: String,
}

impl Default for GenomeNaming {
    fn default() -> Self {
        Self {
            pattern: "*_blast.out".to_string(),
            suffix: ".fasta.new_blast.out".to_string(),
        }
    }
}

impl GenomeNaming {
    pub fn new(pattern: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            suffix: suffix.into(),
        }
    }

    /// Genome label for a result file; the name must end with the suffix
    pub fn label(&self, path: &Path) -> Result<String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| BsrError::InvalidFileName {
                path: path.to_path_buf(),
                reason: "not valid UTF-8".to_string(),
            })?;

        let label = name
            .strip_suffix(self.suffix.as_str())
            .ok_or_else(|| BsrError::InvalidFileName {
                path: path.to_path_buf(),
                reason: format!("expected suffix '{}'", self.suffix),
            })?;

        if label.is_empty() {
            return Err(BsrError::InvalidFileName {
                path: path.to_path_buf(),
                reason: "empty genome label".to_string(),
            });
        }
        Ok(label.to_string())
    }

    /// Result files in `dir`, sorted by path
    pub fn scan(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let dir_str = dir.to_str().ok_or_else(|| BsrError::InvalidFileName {
            path: dir.to_path_buf(),
            reason: "not valid UTF-8".to_string(),
        })?;
        let pattern = Path::new(&glob::Pattern::escape(dir_str)).join(&self.pattern);
        let pattern = pattern.to_string_lossy();

        let entries = glob::glob(&pattern)
            .map_err(|e| BsrError::Config(format!("invalid result file pattern: {}", e)))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| BsrError::Io(e.into()))?;
            if path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Scan and label every result file, rejecting names that break the contract
    pub fn labelled(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>> {
        self.scan(dir)?
            .into_iter()
            .map(|path| Ok((self.label(&path)?, path)))
            .collect()
    }

    /// Result file an aligner should write for a genome FASTA
    pub fn output_for(&self, genome: &Path, out_dir: &Path) -> Result<PathBuf> {
        let name = genome
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| BsrError::InvalidFileName {
                path: genome.to_path_buf(),
                reason: "not valid UTF-8".to_string(),
            })?;
        Ok(out_dir.join(format!("{}_blast.out", name)))
    }
}

/// Per-genome reduced score file
pub fn reduced_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{}.filtered.unique", label))
}

/// Per-genome duplicate count file
pub fn counts_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{}.counts.txt", label))
}
