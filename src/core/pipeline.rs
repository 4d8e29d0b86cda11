//! Whole-run coordination over a directory of alignment results
//!
//! Workers only write files named after their own genome. The joint
//! matrices and id lists are written once every worker has joined and the
//! failure policy has let the run through.

use crate::core::clusters::ClusterUniverse;
use crate::core::config::Config;
use crate::core::counts::{build_evidence, GenomeEvidence};
use crate::core::duplicates::DuplicateReport;
use crate::core::executor::FanOut;
use crate::core::matrix::{BsrMatrix, GenomeColumn};
use crate::core::naming::reduced_path;
use crate::core::reducer::{reduce_file, write_reduced};
use crate::core::reference::ReferenceScores;
use crate::{BsrError, Result};
use std::path::{Path, PathBuf};

pub const RAW_MATRIX_FILE: &str = "bsr_matrix";
pub const VALUE_MATRIX_FILE: &str = "bsr_matrix_values.txt";
pub const DUP_MATRIX_FILE: &str = "dup_matrix.txt";

/// Inputs shared by every stage of a run
pub struct RunContext<'a> {
    /// Directory holding `*_blast.out` files; per-genome files go here too
    pub work_dir: &'a Path,
    /// Where joint outputs are written
    pub out_dir: &'a Path,
    pub universe: &'a ClusterUniverse,
    pub refs: &'a ReferenceScores,
    pub config: &'a Config,
}

impl RunContext<'_> {
    fn fanout(&self) -> Result<FanOut> {
        Ok(FanOut::new(self.config.pipeline.processors)?.with_progress(self.config.pipeline.show_progress))
    }

    fn result_files(&self) -> Result<Vec<PathBuf>> {
        let naming = self.config.pipeline.naming();
        let labelled = naming.labelled(self.work_dir)?;
        if labelled.is_empty() {
            return Err(BsrError::InvalidInput(format!(
                "no alignment results matching {} in {}",
                naming.pattern,
                self.work_dir.display()
            )));
        }
        Ok(labelled.into_iter().map(|(_, path)| path).collect())
    }
}

#[derive(Debug)]
pub struct MatrixOutputs {
    /// Best raw bit score per cluster and genome
    pub raw: BsrMatrix,
    /// Raw scores divided by cluster self scores
    pub values: BsrMatrix,
    pub files: Vec<PathBuf>,
}

/// Reduce every genome's hits to one best score per cluster, assemble the
/// raw matrix and normalise it into BSR values
pub fn build_bsr_matrix(ctx: &RunContext) -> Result<MatrixOutputs> {
    let inputs = ctx.result_files()?;
    let naming = ctx.config.pipeline.naming();
    tracing::info!("Reducing {} alignment result file(s)", inputs.len());

    let columns = ctx.fanout()?.run(
        &inputs,
        ctx.config.pipeline.on_parse_failure,
        "Reducing",
        |path| {
            let label = naming.label(path)?;
            let scores = reduce_file(path)?;
            for query in scores.keys() {
                ctx.refs.score(query, path)?;
            }
            write_reduced(reduced_path(ctx.work_dir, &label), &scores)?;

            let values = ctx
                .universe
                .ids()
                .map(|id| scores.get(id).copied().unwrap_or(0.0))
                .collect();
            Ok(GenomeColumn::new(label, values))
        },
    )?;

    let raw = BsrMatrix::assemble(ctx.universe, columns.into_iter().map(|(_, c)| c).collect())?;
    let raw_path = ctx.out_dir.join(RAW_MATRIX_FILE);
    let values = raw.normalize(ctx.refs, &raw_path)?;

    raw.write(&raw_path)?;
    let values_path = ctx.out_dir.join(VALUE_MATRIX_FILE);
    values.write_with_precision(&values_path, Some(ctx.config.matrix.precision))?;

    tracing::info!(
        "BSR matrix: {} clusters x {} genomes",
        values.n_clusters(),
        values.n_genomes()
    );
    Ok(MatrixOutputs {
        raw,
        values,
        files: vec![raw_path, values_path],
    })
}

#[derive(Debug)]
pub struct DuplicateOutputs {
    pub counts: BsrMatrix,
    pub report: DuplicateReport,
    pub evidence: Vec<GenomeEvidence>,
    pub files: Vec<PathBuf>,
}

/// Count qualifying hits per cluster and genome, then classify duplicates
/// and paralogs
pub fn find_duplicates(ctx: &RunContext) -> Result<DuplicateOutputs> {
    let inputs = ctx.result_files()?;
    let naming = ctx.config.pipeline.naming();
    let thresholds = ctx.config.thresholds.count_thresholds();
    tracing::info!("Counting duplicate evidence in {} file(s)", inputs.len());

    let results = ctx.fanout()?.run(
        &inputs,
        ctx.config.pipeline.on_parse_failure,
        "Counting",
        |path| {
            let label = naming.label(path)?;
            let evidence = build_evidence(path, &label, ctx.refs, ctx.universe, &thresholds)?;
            evidence.write_counts(ctx.work_dir, ctx.universe)?;
            Ok(evidence)
        },
    )?;

    let mut evidence: Vec<GenomeEvidence> = results.into_iter().map(|(_, e)| e).collect();
    evidence.sort_by(|a, b| a.label.cmp(&b.label));

    let columns = evidence
        .iter()
        .map(|e| GenomeColumn::new(e.label.clone(), e.count_column(ctx.universe)))
        .collect();
    let counts = BsrMatrix::assemble(ctx.universe, columns)?.with_corner("ID");
    let report = DuplicateReport::classify(
        &evidence,
        ctx.config.thresholds.max_plog,
        ctx.config.thresholds.duplicate_scope,
    );

    let matrix_path = ctx.out_dir.join(DUP_MATRIX_FILE);
    counts.write(&matrix_path)?;
    let (dup_path, paralog_path) = report.write(ctx.out_dir)?;

    Ok(DuplicateOutputs {
        counts,
        report,
        evidence,
        files: vec![matrix_path, dup_path, paralog_path],
    })
}
