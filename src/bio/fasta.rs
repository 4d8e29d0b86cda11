use crate::bio::sequence::Sequence;
use crate::core::naming::IdSequence;
use crate::{BsrError, Result};
use flate2::read::GzDecoder;
use nom::{
    bytes::complete::{tag, take_till, take_while1},
    character::complete::{line_ending, not_line_ending},
    combinator::{map, opt},
    sequence::preceded,
    IResult,
};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Parse a FASTA header line
fn parse_header(input: &[u8]) -> IResult<&[u8], (&str, Option<&str>)> {
    let (input, _) = tag(b">")(input)?;
    let (input, id) = map(
        take_till(|c: u8| c == b' ' || c == b'\t' || c == b'\n' || c == b'\r'),
        |s| std::str::from_utf8(s).unwrap_or(""),
    )(input)?;
    let (input, description) = opt(preceded(
        take_while1(|c: u8| c == b' ' || c == b'\t'),
        map(not_line_ending, |s| std::str::from_utf8(s).unwrap_or("")),
    ))(input)?;
    let (input, _) = opt(line_ending)(input)?;
    Ok((input, (id, description)))
}

/// Parse sequence lines until next header or EOF
fn parse_sequence(input: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let mut sequence = Vec::new();
    let mut remaining = input;

    while !remaining.is_empty() && remaining[0] != b'>' {
        let (rest, line) =
            take_till::<_, _, nom::error::Error<_>>(|c: u8| c == b'\n' || c == b'\r')(remaining)?;
        let (rest, _) = opt(line_ending)(rest)?;
        // a lone '\r' is not consumed by line_ending
        let rest = rest.strip_prefix(b"\r").unwrap_or(rest);

        for &c in line {
            if !c.is_ascii_whitespace() {
                sequence.push(c.to_ascii_uppercase());
            }
        }

        remaining = rest;
    }

    Ok((remaining, sequence))
}

/// Parse a single FASTA record
fn parse_record(input: &[u8]) -> IResult<&[u8], Sequence> {
    let (input, (id, description)) = parse_header(input)?;
    let (input, sequence) = parse_sequence(input)?;

    let mut seq = Sequence::new(id.to_string(), sequence);
    if let Some(desc) = description.map(str::trim).filter(|d| !d.is_empty()) {
        seq = seq.with_description(desc.to_string());
    }

    Ok((input, seq))
}

/// Parse FASTA from bytes
///
/// Records with an empty sequence are kept: their identifiers still count
/// towards header uniqueness checks.
pub fn parse_fasta_from_bytes(data: &[u8]) -> Result<Vec<Sequence>> {
    let mut sequences = Vec::new();
    let mut remaining = data;

    loop {
        while !remaining.is_empty() && remaining[0].is_ascii_whitespace() {
            remaining = &remaining[1..];
        }

        if remaining.is_empty() {
            break;
        }

        if remaining[0] != b'>' {
            return Err(BsrError::Parse(format!(
                "expected '>' at the start of record {}",
                sequences.len() + 1
            )));
        }

        let (rest, seq) = parse_record(remaining)
            .map_err(|e| BsrError::Parse(format!("Failed to parse FASTA record: {:?}", e)))?;
        if seq.id.is_empty() {
            return Err(BsrError::Parse(format!(
                "empty identifier in record {}",
                sequences.len() + 1
            )));
        }
        sequences.push(seq);

        remaining = rest;
    }

    Ok(sequences)
}

/// Parse a FASTA file into sequences (supports .gz compression)
pub fn parse_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<Sequence>> {
    let path = path.as_ref();

    let buffer = if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let file = File::open(path)?;
        let mut decoder = GzDecoder::new(BufReader::new(file));
        let mut buffer = Vec::new();
        decoder.read_to_end(&mut buffer)?;
        buffer
    } else {
        std::fs::read(path)?
    };

    parse_fasta_from_bytes(&buffer)
        .map_err(|e| BsrError::Parse(format!("{}: {}", path.display(), e)))
}

/// Identifiers of every record in file order
pub fn fasta_ids<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    Ok(parse_fasta(path)?.into_iter().map(|seq| seq.id).collect())
}

/// Whether every header identifier in the file is distinct
pub fn has_unique_ids<P: AsRef<Path>>(path: P) -> Result<bool> {
    let ids = fasta_ids(path)?;
    let mut seen = HashSet::with_capacity(ids.len());
    Ok(ids.iter().all(|id| seen.insert(id.as_str())))
}

/// Write sequences to a FASTA file (supports .gz compression)
pub fn write_fasta<P: AsRef<Path>>(path: P, sequences: &[Sequence]) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let path = path.as_ref();
    let file = File::create(path)?;

    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let encoder = GzEncoder::new(file, Compression::default());
        let mut writer = BufWriter::new(encoder);
        write_fasta_to_writer(&mut writer, sequences)?;
        writer.flush()?;
    } else {
        let mut writer = BufWriter::new(file);
        write_fasta_to_writer(&mut writer, sequences)?;
        writer.flush()?;
    }

    Ok(())
}

/// Write sequences to any writer, one unwrapped sequence line per record
pub fn write_fasta_to_writer<W: Write>(writer: &mut W, sequences: &[Sequence]) -> Result<()> {
    for seq in sequences {
        writeln!(writer, "{}", seq.header())?;
        writer.write_all(&seq.sequence)?;
        writeln!(writer)?;
    }
    Ok(())
}

/// Keep records of at least `min_length` residues
pub fn filter_by_length(sequences: Vec<Sequence>, min_length: usize) -> Vec<Sequence> {
    sequences
        .into_iter()
        .filter(|seq| seq.len() >= min_length)
        .collect()
}

/// Drop every record containing an ambiguous base.
///
/// A single N removes the whole contig. Fails when nothing usable is left.
pub fn reject_scaffolds(sequences: Vec<Sequence>) -> Result<Vec<Sequence>> {
    let total = sequences.len();
    let kept: Vec<Sequence> = sequences.into_iter().filter(|seq| !seq.has_gap()).collect();

    if kept.is_empty() {
        return Err(BsrError::InvalidInput(format!(
            "no usable records among {} (all empty or containing scaffold gaps)",
            total
        )));
    }
    if kept.len() < total {
        tracing::info!("Dropped {} scaffolded record(s)", total - kept.len());
    }
    Ok(kept)
}

/// Rename records to `<prefix>_<n>` drawing numbers from `ids`.
///
/// Returns the renamed records and the `(old, new)` pairs.
pub fn rename_with_sequence(
    sequences: Vec<Sequence>,
    prefix: &str,
    ids: &mut IdSequence,
) -> (Vec<Sequence>, Vec<(String, String)>) {
    let mut renames = Vec::with_capacity(sequences.len());
    let renamed = sequences
        .into_iter()
        .map(|mut seq| {
            let new_id = format!("{}_{}", prefix, ids.next_id());
            renames.push((std::mem::replace(&mut seq.id, new_id.clone()), new_id));
            seq.description = None;
            seq
        })
        .collect();
    (renamed, renames)
}

/// Records whose identifier is in `ids`, in file order
pub fn select_ids(sequences: &[Sequence], ids: &[String]) -> Vec<Sequence> {
    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    sequences
        .iter()
        .filter(|seq| wanted.contains(seq.id.as_str()))
        .cloned()
        .collect()
}
