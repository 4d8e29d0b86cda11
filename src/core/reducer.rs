//! Best-hit reduction of alignment results

use crate::bio::blast_tab::HitReader;
use crate::Result;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fs::File;
use std::hash::Hash;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Keep the highest-scoring item per key.
///
/// The first occurrence of a key fixes its position; a later item replaces
/// the kept one only when its score is strictly greater. Output is in
/// first-seen key order.
pub fn keep_best<T, K, FK, FS>(items: impl IntoIterator<Item = T>, key: FK, score: FS) -> IndexMap<K, T>
where
    K: Hash + Eq,
    FK: Fn(&T) -> K,
    FS: Fn(&T) -> f64,
{
    let mut best: IndexMap<K, T> = IndexMap::new();
    for item in items {
        match best.entry(key(&item)) {
            Entry::Occupied(mut kept) => {
                if score(&item) > score(kept.get()) {
                    kept.insert(item);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
        }
    }
    best
}

/// Best bit score per query of one alignment result file
pub fn reduce_file<P: AsRef<Path>>(path: P) -> Result<IndexMap<String, f64>> {
    let mut hits = Vec::new();
    for hit in HitReader::open(path)? {
        let hit = hit?;
        hits.push((hit.query_id, hit.bit_score));
    }

    Ok(keep_best(hits, |(query, _)| query.clone(), |&(_, score)| score)
        .into_iter()
        .map(|(query, (_, score))| (query, score))
        .collect())
}

/// Write `query\tscore` lines
pub fn write_reduced<P: AsRef<Path>>(path: P, scores: &IndexMap<String, f64>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (query, score) in scores {
        writeln!(writer, "{}\t{}", query, score)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a file written by [`write_reduced`]
pub fn read_reduced<P: AsRef<Path>>(path: P) -> Result<IndexMap<String, f64>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut scores = IndexMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let (Some(query), Some(score)) = (fields.next(), fields.next()) else {
            return Err(crate::BsrError::malformed(path, idx + 1, "expected query and score"));
        };
        let score: f64 = score.trim().parse().map_err(|_| {
            crate::BsrError::malformed(path, idx + 1, format!("invalid score '{}'", score))
        })?;
        scores.insert(query.to_string(), score);
    }
    Ok(scores)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BsrError;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn blast_line(query: &str, bit: f64) -> String {
        format!("{}\tsubj\t99.0\t100\t1\t0\t1\t100\t1\t100\t1e-30\t{}\n", query, bit)
    }

    #[test]
    fn test_keep_best_takes_later_higher_score() {
        let best = keep_best(
            vec![("Q1", 10.0), ("Q2", 5.0), ("Q1", 25.0)],
            |&(k, _)| k,
            |&(_, s)| s,
        );
        assert_eq!(best["Q1"], ("Q1", 25.0));
        assert_eq!(best.keys().copied().collect::<Vec<_>>(), vec!["Q1", "Q2"]);
    }

    #[test]
    fn test_keep_best_ties_keep_first() {
        let best = keep_best(vec![("Q", 7.0, "first"), ("Q", 7.0, "second")], |t| t.0, |t| t.1);
        assert_eq!(best["Q"].2, "first");
    }

    #[test]
    fn test_reduce_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("g.fasta.new_blast.out");
        let data = [
            blast_line("Q1", 10.0),
            blast_line("Q2", 40.0),
            blast_line("Q1", 25.0),
            blast_line("Q2", 12.0),
        ]
        .concat();
        std::fs::write(&path, data).unwrap();

        let scores = reduce_file(&path).unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores["Q1"], 25.0);
        assert_eq!(scores["Q2"], 40.0);
    }

    #[test]
    fn test_reduce_file_rejects_short_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad_blast.out");
        std::fs::write(&path, format!("{}Q9\tsubj\t99\n", blast_line("Q1", 1.0))).unwrap();

        assert!(matches!(
            reduce_file(&path),
            Err(BsrError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_reduced_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.filtered.unique");
        let mut scores = IndexMap::new();
        scores.insert("centroid_2".to_string(), 88.5);
        scores.insert("centroid_1".to_string(), 120.0);

        write_reduced(&path, &scores).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "centroid_2\t88.5\ncentroid_1\t120\n");
        assert_eq!(read_reduced(&path).unwrap(), scores);
    }

    proptest! {
        #[test]
        fn prop_one_score_per_query_equal_to_max(
            hits in prop::collection::vec((0usize..6, 0u32..10_000), 0..60)
        ) {
            let items: Vec<(String, f64)> = hits
                .iter()
                .map(|&(q, s)| (format!("Q{}", q), s as f64 / 10.0))
                .collect();

            let best = keep_best(items.clone(), |(k, _)| k.clone(), |&(_, s)| s);

            let mut expected: HashMap<String, f64> = HashMap::new();
            for (k, s) in &items {
                let entry = expected.entry(k.clone()).or_insert(*s);
                if *s > *entry {
                    *entry = *s;
                }
            }
            prop_assert_eq!(best.len(), expected.len());
            for (k, (_, s)) in &best {
                prop_assert_eq!(*s, expected[k]);
            }
        }
    }
}
