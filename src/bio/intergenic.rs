//! Intergenic regions from gene-prediction GFF output

use crate::bio::sequence::Sequence;
use crate::{BsrError, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// 1-based inclusive coordinates on a contig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub contig: String,
    pub start: u64,
    pub stop: u64,
}

/// Coding ranges per contig from a GFF file, sorted by start
pub fn coding_ranges_from_gff<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, Vec<(u64, u64)>>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut ranges: BTreeMap<String, Vec<(u64, u64)>> = BTreeMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            return Err(BsrError::malformed(
                path,
                idx + 1,
                format!("expected at least 5 GFF fields, found {}", fields.len()),
            ));
        }
        let start: u64 = fields[3]
            .parse()
            .map_err(|_| BsrError::malformed(path, idx + 1, format!("invalid start '{}'", fields[3])))?;
        let stop: u64 = fields[4]
            .parse()
            .map_err(|_| BsrError::malformed(path, idx + 1, format!("invalid stop '{}'", fields[4])))?;

        ranges
            .entry(fields[0].to_string())
            .or_default()
            .push((start, stop));
    }

    for contig_ranges in ranges.values_mut() {
        contig_ranges.sort_by_key(|&(start, _)| start);
    }
    Ok(ranges)
}

/// Gaps between coding ranges, including the one before the first gene.
///
/// Genes nested in or overlapping an earlier gene never open a gap.
pub fn intergenic_ranges(coding: &BTreeMap<String, Vec<(u64, u64)>>) -> Vec<Region> {
    let mut regions = Vec::new();

    for (contig, ranges) in coding {
        let Some(&(first_start, first_stop)) = ranges.first() else {
            continue;
        };
        if first_start > 1 {
            regions.push(Region {
                contig: contig.clone(),
                start: 1,
                stop: first_start - 1,
            });
        }

        let mut covered_to = first_stop;
        for &(start, stop) in &ranges[1..] {
            if covered_to + 1 < start {
                regions.push(Region {
                    contig: contig.clone(),
                    start: covered_to + 1,
                    stop: start - 1,
                });
            }
            covered_to = covered_to.max(stop);
        }
    }
    regions
}

/// Sequences of the regions longer than `min_length` bases.
///
/// Records are named `<contig>_<start0>_<stop>` with a 0-based start.
pub fn extract_intergenic(genome: &[Sequence], regions: &[Region], min_length: usize) -> Vec<Sequence> {
    let contigs: BTreeMap<&str, &Sequence> = genome.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut out = Vec::new();

    for region in regions {
        let Some(contig) = contigs.get(region.contig.as_str()) else {
            tracing::debug!("Contig {} not present in genome", region.contig);
            continue;
        };
        let start = (region.start.saturating_sub(1) as usize).min(contig.len());
        let end = (region.stop as usize).min(contig.len());
        if end <= start || end - start <= min_length {
            continue;
        }
        out.push(Sequence::new(
            format!("{}_{}_{}", region.contig, start, end),
            contig.sequence[start..end].to_vec(),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn region(contig: &str, start: u64, stop: u64) -> Region {
        Region {
            contig: contig.to_string(),
            start,
            stop,
        }
    }

    #[test]
    fn test_parse_gff_sorts_ranges() {
        let dir = TempDir::new().unwrap();
        let gff = dir.path().join("g.prodigal");
        std::fs::write(
            &gff,
            "##gff-version  3\n\
             c1\tProdigal_v2\tCDS\t500\t800\t.\t+\t0\tID=1_2\n\
             c1\tProdigal_v2\tCDS\t10\t300\t.\t+\t0\tID=1_1\n\
             c2\tProdigal_v2\tCDS\t1\t90\t.\t-\t0\tID=2_1\n",
        )
        .unwrap();

        let ranges = coding_ranges_from_gff(&gff).unwrap();
        assert_eq!(ranges["c1"], vec![(10, 300), (500, 800)]);
        assert_eq!(ranges["c2"], vec![(1, 90)]);
    }

    #[test]
    fn test_malformed_gff_line() {
        let dir = TempDir::new().unwrap();
        let gff = dir.path().join("bad.gff");
        std::fs::write(&gff, "c1\tProdigal\tCDS\tten\t300\n").unwrap();

        assert!(matches!(
            coding_ranges_from_gff(&gff),
            Err(BsrError::MalformedRecord { line: 1, .. })
        ));
    }

    #[test]
    fn test_intergenic_gaps() {
        let mut coding = BTreeMap::new();
        coding.insert("c1".to_string(), vec![(10, 300), (320, 400), (350, 380), (401, 500), (600, 700)]);
        coding.insert("c2".to_string(), vec![(1, 90)]);

        let regions = intergenic_ranges(&coding);
        assert_eq!(
            regions,
            vec![region("c1", 1, 9), region("c1", 301, 319), region("c1", 501, 599)]
        );
    }

    #[test]
    fn test_extract_intergenic_min_length() {
        let genome = vec![Sequence::new("c1".to_string(), vec![b'A'; 200])];
        let regions = vec![region("c1", 1, 60), region("c1", 100, 130), region("missing", 1, 100)];

        let seqs = extract_intergenic(&genome, &regions, 50);
        assert_eq!(seqs.len(), 1);
        assert_eq!(seqs[0].id, "c1_0_60");
        assert_eq!(seqs[0].len(), 60);
    }
}
