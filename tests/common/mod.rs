//! Shared fixtures for lsbsr integration tests
//!
//! Builds a scratch work directory holding a consensus FASTA, its self
//! alignment and per-genome alignment results named the way aligners write
//! them.

#![allow(dead_code)]

use lsbsr::core::config::Config;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        TestEnvironment {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Consensus FASTA with one short record per id
    pub fn write_consensus(&self, ids: &[&str]) -> PathBuf {
        let path = self.path("consensus.fasta");
        let text: String = ids.iter().map(|id| format!(">{}\nATGAAACCCGGGTTT\n", id)).collect();
        std::fs::write(&path, text).expect("Failed to write consensus");
        path
    }

    /// Self alignment giving each cluster the given self score
    pub fn write_self_alignment(&self, scores: &[(&str, f64)]) -> PathBuf {
        let path = self.path("self_blast.txt");
        let text: String = scores
            .iter()
            .map(|&(id, score)| hit_line(id, id, 100.0, score))
            .collect();
        std::fs::write(&path, text).expect("Failed to write self alignment");
        path
    }

    /// `<label>.fasta.new_blast.out` holding `(query, identity, bit)` hits
    pub fn write_genome_hits(&self, label: &str, hits: &[(&str, f64, f64)]) -> PathBuf {
        let path = self.path(&format!("{}.fasta.new_blast.out", label));
        let text: String = hits
            .iter()
            .enumerate()
            .map(|(i, &(query, ident, bit))| hit_line(query, &format!("contig_{}", i), ident, bit))
            .collect();
        std::fs::write(&path, text).expect("Failed to write genome hits");
        path
    }
}

pub fn hit_line(query: &str, subject: &str, identity: f64, bit: f64) -> String {
    format!(
        "{}\t{}\t{}\t120\t2\t0\t1\t120\t1\t120\t1e-40\t{}\n",
        query, subject, identity, bit
    )
}

/// Default configuration without progress bars on a small pool
pub fn quiet_config() -> Config {
    let mut config = Config::default();
    config.pipeline.processors = 2;
    config.pipeline.show_progress = false;
    config
}
