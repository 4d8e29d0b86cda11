//! Seam for the external aligners that produce tabular results
//!
//! BLAST, BLAT and friends stay opaque: an implementation only has to write
//! a tab-separated result file for one query/target pair.

use anyhow::Result;
use std::path::Path;

pub trait Aligner: Send + Sync {
    /// Align `query` against `target`, writing tabular hits to `output`
    fn align(&self, query: &Path, target: &Path, output: &Path) -> Result<()>;

    /// Get the name of this aligner
    fn name(&self) -> &str;
}
