//! Error types for lsbsr

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for matrix assembly and analysis
#[derive(Error, Debug)]
pub enum BsrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record in {} line {line}: {reason}", .file.display())]
    MalformedRecord {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("No reference score for query '{query_id}' (seen in {})", .file.display())]
    MissingReferenceScore { query_id: String, file: PathBuf },

    #[error("Duplicate cluster id '{0}'")]
    DuplicateClusterId(String),

    #[error("Duplicate genome label '{0}'")]
    DuplicateGenomeLabel(String),

    #[error("{tool} failed on {}: {reason}", .input.display())]
    ExternalToolFailure {
        tool: String,
        input: PathBuf,
        reason: String,
    },

    #[error("Matrix shape error: {0}")]
    MatrixShape(String),

    #[error("Invalid file name {}: {reason}", .path.display())]
    InvalidFileName { path: PathBuf, reason: String },

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{} input file(s) failed:\n{}", .0.len(), summarize(.0))]
    WorkerFailures(Vec<WorkerFailure>),
}

impl BsrError {
    pub fn malformed(file: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        BsrError::MalformedRecord {
            file: file.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Errors that invalidate the whole run no matter which file raised them.
    ///
    /// A missing reference score means the alignments were computed against a
    /// different cluster set than the one declared.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, BsrError::MissingReferenceScore { .. })
    }
}

/// A failure caught at the worker boundary, tagged with its input file
#[derive(Debug)]
pub struct WorkerFailure {
    pub input: PathBuf,
    pub error: BsrError,
}

impl fmt::Display for WorkerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.input.display(), self.error)
    }
}

fn summarize(failures: &[WorkerFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("  {}", failure))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type alias for lsbsr operations
pub type Result<T> = std::result::Result<T, BsrError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let malformed = BsrError::malformed("genome_a.fasta.new_blast.out", 3, "expected at least 12 fields, found 4");
        assert_eq!(
            format!("{}", malformed),
            "Malformed record in genome_a.fasta.new_blast.out line 3: expected at least 12 fields, found 4"
        );

        let missing = BsrError::MissingReferenceScore {
            query_id: "centroid_7".to_string(),
            file: PathBuf::from("b_blast.out"),
        };
        assert_eq!(
            format!("{}", missing),
            "No reference score for query 'centroid_7' (seen in b_blast.out)"
        );

        let dup = BsrError::DuplicateClusterId("centroid_1".to_string());
        assert_eq!(format!("{}", dup), "Duplicate cluster id 'centroid_1'");

        let tool = BsrError::ExternalToolFailure {
            tool: "blastn".to_string(),
            input: PathBuf::from("x.fasta.new"),
            reason: "exit status 2".to_string(),
        };
        assert_eq!(format!("{}", tool), "blastn failed on x.fasta.new: exit status 2");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: BsrError = io_err.into();

        match err {
            BsrError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::PermissionDenied),
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_worker_failures_lists_every_file() {
        let failures = vec![
            WorkerFailure {
                input: PathBuf::from("a_blast.out"),
                error: BsrError::malformed("a_blast.out", 1, "bad bit score"),
            },
            WorkerFailure {
                input: PathBuf::from("b_blast.out"),
                error: BsrError::malformed("b_blast.out", 9, "expected at least 12 fields, found 2"),
            },
        ];
        let message = format!("{}", BsrError::WorkerFailures(failures));

        assert!(message.starts_with("2 input file(s) failed:"));
        assert!(message.contains("a_blast.out: Malformed record"));
        assert!(message.contains("b_blast.out: Malformed record"));
    }

    #[test]
    fn test_only_missing_reference_is_run_fatal() {
        let missing = BsrError::MissingReferenceScore {
            query_id: "q".to_string(),
            file: PathBuf::from("f"),
        };
        assert!(missing.is_run_fatal());
        assert!(!BsrError::malformed("f", 1, "short").is_run_fatal());
        assert!(!BsrError::Config("x".to_string()).is_run_fatal());
    }
}
