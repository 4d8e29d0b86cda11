use lsbsr::core::config::{load_config, save_config, Config};
use lsbsr::{BsrError, DuplicateScope, FailurePolicy};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_full_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[thresholds]
max_plog = 0.3
min_hlog = 80
length = 0.5
duplicate_scope = "pooled"

[matrix]
upper = 0.9
lower = 0.2
precision = 3

[pipeline]
processors = 8
on_parse_failure = "skip"
on_tool_failure = "abort"
genome_pattern = "*.out"
genome_suffix = ".out"
show_progress = false

[sequences]
min_length = 100
"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.thresholds.min_hlog, 80.0);
    assert_eq!(config.thresholds.duplicate_scope, DuplicateScope::Pooled);
    assert_eq!(config.matrix.precision, 3);
    assert_eq!(config.pipeline.on_parse_failure, FailurePolicy::Skip);
    assert_eq!(config.pipeline.naming().suffix, ".out");
    assert_eq!(config.sequences.min_length, 100);
    assert_eq!(config.sequences.min_peptide_length, 50);

    let counts = config.thresholds.count_thresholds();
    assert!(counts.passes(80.0, 0.5));
    assert!(!counts.passes(79.9, 0.9));
}

#[test]
fn test_unknown_policy_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[pipeline]\non_tool_failure = \"retry\"").unwrap();
    assert!(matches!(load_config(file.path()), Err(BsrError::Config(_))));
}

#[test]
fn test_missing_file_is_io_error() {
    assert!(matches!(
        load_config("/nonexistent/lsbsr.toml"),
        Err(BsrError::Io(_))
    ));
}

#[test]
fn test_saved_default_is_readable() {
    let file = NamedTempFile::new().unwrap();
    save_config(file.path(), &Config::default()).unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    assert!(text.contains("[thresholds]"));
    assert!(text.contains("on_parse_failure = \"abort\""));
    assert_eq!(load_config(file.path()).unwrap(), Config::default());
}
