pub mod bio;
pub mod cli;
pub mod core;
pub mod error;
pub mod tools;
pub mod utils;

pub use crate::core::{
    clusters::ClusterUniverse,
    counts::{CountThresholds, GenomeEvidence},
    duplicates::{DuplicateReport, DuplicateScope},
    executor::{FailurePolicy, FanOut},
    matrix::{BsrMatrix, GenomeColumn},
    reference::ReferenceScores,
};
pub use crate::error::{BsrError, Result, WorkerFailure};
