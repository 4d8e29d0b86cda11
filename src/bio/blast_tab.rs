//! Tabular alignment results (BLAST `-outfmt 6`, BLAT `blast8`)
//!
//! ```text
//! Col  Field
//! 1    query id
//! 2    subject id
//! 3    percent identity
//! 4    alignment length
//! 5    mismatches
//! 6    gap opens
//! 7-8  query start, end
//! 9-10 subject start, end
//! 11   e-value
//! 12   bit score
//! ```
//!
//! Extra trailing columns are ignored. Blank lines and `#` comment lines are
//! skipped; anything else with fewer than 12 columns is malformed.

use crate::{BsrError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const MIN_FIELDS: usize = 12;

/// One alignment line
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentHit {
    pub query_id: String,
    pub subject_id: String,
    pub percent_identity: f64,
    pub alignment_length: u64,
    pub mismatches: u64,
    pub gap_opens: u64,
    pub query_start: u64,
    pub query_end: u64,
    pub subject_start: u64,
    pub subject_end: u64,
    pub evalue: f64,
    pub bit_score: f64,
}

impl AlignmentHit {
    /// Parse a tab-separated line. `Err` carries the reason only; callers
    /// attach file and line.
    pub fn parse_line(line: &str) -> std::result::Result<Self, String> {
        let fields: Vec<&str> = line.trim_end_matches(['\n', '\r']).split('\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(format!(
                "expected at least {} fields, found {}",
                MIN_FIELDS,
                fields.len()
            ));
        }

        Ok(Self {
            query_id: field_id(fields[0], "query id")?,
            subject_id: field_id(fields[1], "subject id")?,
            percent_identity: field(fields[2], "percent identity")?,
            alignment_length: field(fields[3], "alignment length")?,
            mismatches: field(fields[4], "mismatches")?,
            gap_opens: field(fields[5], "gap opens")?,
            query_start: field(fields[6], "query start")?,
            query_end: field(fields[7], "query end")?,
            subject_start: field(fields[8], "subject start")?,
            subject_end: field(fields[9], "subject end")?,
            evalue: field(fields[10], "e-value")?,
            bit_score: field(fields[11], "bit score")?,
        })
    }

    pub fn is_self_hit(&self) -> bool {
        self.query_id == self.subject_id
    }
}

fn field_id(raw: &str, name: &str) -> std::result::Result<String, String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(format!("empty {}", name));
    }
    Ok(id.to_string())
}

fn field<T: FromStr>(raw: &str, name: &str) -> std::result::Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("invalid {} '{}'", name, raw))
}

/// Streaming reader over an alignment result file
pub struct HitReader<R: BufRead> {
    reader: R,
    source: PathBuf,
    line_number: usize,
    buffer: String,
}

impl HitReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> HitReader<R> {
    pub fn new(reader: R, source: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            source: source.into(),
            line_number: 0,
            buffer: String::new(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Next hit, `Ok(None)` at end of input
    pub fn read_next(&mut self) -> Result<Option<AlignmentHit>> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = self.buffer.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            return AlignmentHit::parse_line(line)
                .map(Some)
                .map_err(|reason| BsrError::malformed(&self.source, self.line_number, reason));
        }
    }
}

impl<R: BufRead> Iterator for HitReader<R> {
    type Item = Result<AlignmentHit>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

/// Read every hit of a file, failing on the first malformed line
pub fn read_hits<P: AsRef<Path>>(path: P) -> Result<Vec<AlignmentHit>> {
    HitReader::open(path)?.collect()
}
