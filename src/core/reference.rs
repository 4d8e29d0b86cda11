//! Self-alignment scores used as the BSR denominator

use crate::bio::blast_tab::{AlignmentHit, HitReader};
use crate::{BsrError, Result};
use indexmap::IndexMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceScores {
    scores: IndexMap<String, f64>,
}

impl ReferenceScores {
    /// Best self-hit per query from a self-alignment result file.
    ///
    /// Among hits with `subject == query` the highest bit score wins. A query
    /// with no true self-hit falls back to its highest-scoring hit.
    pub fn from_self_alignment<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut hits = Vec::new();
        for hit in HitReader::open(path)? {
            hits.push(hit?);
        }
        Ok(Self::from_hits(&hits))
    }

    pub fn from_hits(hits: &[AlignmentHit]) -> Self {
        let mut self_hits: IndexMap<String, f64> = IndexMap::new();
        let mut any_hits: IndexMap<String, f64> = IndexMap::new();

        for hit in hits {
            let best = if hit.is_self_hit() {
                &mut self_hits
            } else {
                &mut any_hits
            };
            best.entry(hit.query_id.clone())
                .and_modify(|score| {
                    if hit.bit_score > *score {
                        *score = hit.bit_score;
                    }
                })
                .or_insert(hit.bit_score);
        }

        let mut scores = IndexMap::with_capacity(self_hits.len().max(any_hits.len()));
        for hit in hits {
            if scores.contains_key(&hit.query_id) {
                continue;
            }
            let score = match self_hits.get(&hit.query_id) {
                Some(&score) => score,
                None => {
                    tracing::debug!(
                        "No self-hit for {}, using its best hit as reference",
                        hit.query_id
                    );
                    any_hits[&hit.query_id]
                }
            };
            scores.insert(hit.query_id.clone(), score);
        }

        Self { scores }
    }

    pub fn from_map(scores: IndexMap<String, f64>) -> Self {
        Self { scores }
    }

    pub fn get(&self, query_id: &str) -> Option<f64> {
        self.scores.get(query_id).copied()
    }

    /// Reference score for a query seen in `file`; absence is a data-integrity fault
    pub fn score(&self, query_id: &str, file: &Path) -> Result<f64> {
        self.get(query_id)
            .ok_or_else(|| BsrError::MissingReferenceScore {
                query_id: query_id.to_string(),
                file: file.to_path_buf(),
            })
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(id, &score)| (id.as_str(), score))
    }
}
