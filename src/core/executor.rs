//! Bounded per-file fan-out
//!
//! Each task sees exactly one input and returns a self-contained value.
//! Nothing is shared between workers; the coordinator merges results after
//! every worker has joined and decides, from the collected failures, whether
//! the run proceeds.

use crate::error::WorkerFailure;
use crate::utils::parallel::build_pool;
use crate::utils::progress::create_progress_bar;
use crate::{BsrError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What the coordinator does with a per-file failure at join time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Report every failed file and halt
    Abort,
    /// Log each failed file and continue with the rest
    Skip,
}

impl std::str::FromStr for FailurePolicy {
    type Err = BsrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(BsrError::Config(format!(
                "unknown failure policy '{}', expected 'abort' or 'skip'",
                other
            ))),
        }
    }
}

pub struct FanOut {
    pool: rayon::ThreadPool,
    show_progress: bool,
}

impl FanOut {
    pub fn new(processors: usize) -> Result<Self> {
        Ok(Self {
            pool: build_pool(processors)?,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Apply `task` to every input on the pool.
    ///
    /// Successful results come back sorted by input path. Run-fatal errors
    /// abort under either policy.
    pub fn run<T, F>(
        &self,
        inputs: &[PathBuf],
        policy: FailurePolicy,
        message: &str,
        task: F,
    ) -> Result<Vec<(PathBuf, T)>>
    where
        T: Send,
        F: Fn(&Path) -> Result<T> + Sync,
    {
        let pb = create_progress_bar(inputs.len() as u64, message, self.show_progress);

        let outcomes: Vec<(PathBuf, Result<T>)> = self.pool.install(|| {
            inputs
                .par_iter()
                .map(|input| {
                    let outcome = task(input);
                    pb.inc(1);
                    (input.clone(), outcome)
                })
                .collect()
        });
        pb.finish_and_clear();

        join(outcomes, policy)
    }
}

/// Split worker outcomes and apply the failure policy
fn join<T>(outcomes: Vec<(PathBuf, Result<T>)>, policy: FailurePolicy) -> Result<Vec<(PathBuf, T)>> {
    let mut results = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();

    for (input, outcome) in outcomes {
        match outcome {
            Ok(value) => results.push((input, value)),
            Err(error) => failures.push(WorkerFailure { input, error }),
        }
    }

    failures.sort_by(|a, b| a.input.cmp(&b.input));
    let (fatal, failures) = split_fatal(failures);
    if let Some(fatal) = fatal {
        for other in &failures {
            tracing::warn!("Also failed: {}", other);
        }
        tracing::error!("{}", fatal);
        return Err(fatal.error);
    }

    if !failures.is_empty() {
        match policy {
            FailurePolicy::Abort => {
                return Err(BsrError::WorkerFailures(failures));
            }
            FailurePolicy::Skip => {
                for failure in &failures {
                    tracing::warn!("Skipping {}", failure);
                }
            }
        }
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}

/// First run-fatal failure, if any, and every other failure in input order
fn split_fatal(failures: Vec<WorkerFailure>) -> (Option<WorkerFailure>, Vec<WorkerFailure>) {
    let mut fatal = None;
    let mut others = Vec::with_capacity(failures.len());
    for failure in failures {
        if fatal.is_none() && failure.error.is_run_fatal() {
            fatal = Some(failure);
        } else {
            others.push(failure);
        }
    }
    (fatal, others)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn task(path: &Path) -> Result<usize> {
        let name = path.to_string_lossy();
        if name.starts_with("bad") {
            Err(BsrError::malformed(path, 1, "short line"))
        } else if name.starts_with("alien") {
            Err(BsrError::MissingReferenceScore {
                query_id: "q".to_string(),
                file: path.to_path_buf(),
            })
        } else {
            Ok(name.len())
        }
    }

    #[test]
    fn test_results_sorted_by_input() {
        let fanout = FanOut::new(4).unwrap();
        let results = fanout
            .run(&inputs(&["c", "a", "bb"]), FailurePolicy::Abort, "test", task)
            .unwrap();

        let order: Vec<_> = results.iter().map(|(p, v)| (p.to_string_lossy().to_string(), *v)).collect();
        assert_eq!(
            order,
            vec![("a".to_string(), 1), ("bb".to_string(), 2), ("c".to_string(), 1)]
        );
    }

    #[test]
    fn test_abort_lists_every_failure() {
        let fanout = FanOut::new(2).unwrap();
        let err = fanout
            .run(&inputs(&["ok", "bad2", "bad1"]), FailurePolicy::Abort, "test", task)
            .unwrap_err();

        match err {
            BsrError::WorkerFailures(failures) => {
                let files: Vec<_> = failures.iter().map(|f| f.input.clone()).collect();
                assert_eq!(files, inputs(&["bad1", "bad2"]));
            }
            other => panic!("expected worker failures, got {:?}", other),
        }
    }

    #[test]
    fn test_skip_keeps_successes() {
        let fanout = FanOut::new(2).unwrap();
        let results = fanout
            .run(&inputs(&["ok", "bad"]), FailurePolicy::Skip, "test", task)
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, PathBuf::from("ok"));
    }

    #[test]
    fn test_missing_reference_aborts_even_when_skipping() {
        let fanout = FanOut::new(2).unwrap();
        let err = fanout
            .run(&inputs(&["ok", "alien"]), FailurePolicy::Skip, "test", task)
            .unwrap_err();
        assert!(matches!(err, BsrError::MissingReferenceScore { .. }));
    }

    #[test]
    fn test_fatal_split_keeps_remaining_failures() {
        let failures = vec![
            WorkerFailure { input: PathBuf::from("a"), error: BsrError::malformed("a", 3, "short line") },
            WorkerFailure { input: PathBuf::from("alien1"), error: task(Path::new("alien1")).unwrap_err() },
            WorkerFailure { input: PathBuf::from("alien2"), error: task(Path::new("alien2")).unwrap_err() },
        ];

        let (fatal, others) = split_fatal(failures);
        assert_eq!(fatal.map(|f| f.input), Some(PathBuf::from("alien1")));
        let rest: Vec<_> = others.iter().map(|f| f.input.clone()).collect();
        assert_eq!(rest, inputs(&["a", "alien2"]));
    }

    #[test]
    fn test_fatal_error_is_the_first_by_path() {
        let fanout = FanOut::new(4).unwrap();
        let err = fanout
            .run(&inputs(&["alien_z", "bad", "alien_a", "ok"]), FailurePolicy::Abort, "test", task)
            .unwrap_err();
        match err {
            BsrError::MissingReferenceScore { file, .. } => assert_eq!(file, PathBuf::from("alien_a")),
            other => panic!("expected missing reference score, got {:?}", other),
        }
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Skip".parse::<FailurePolicy>().unwrap(), FailurePolicy::Skip);
        assert_eq!("abort".parse::<FailurePolicy>().unwrap(), FailurePolicy::Abort);
        assert!("retry".parse::<FailurePolicy>().is_err());
    }
}
