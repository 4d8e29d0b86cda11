//! The ordered set of cluster ids that defines matrix rows

use crate::bio::fasta;
use crate::{BsrError, Result};
use indexmap::IndexSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterUniverse {
    ids: IndexSet<String>,
}

impl ClusterUniverse {
    /// Ids in the given order; a repeated id is rejected, never collapsed
    pub fn from_ids<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = IndexSet::new();
        for id in ids {
            let id = id.into();
            if set.contains(&id) {
                return Err(BsrError::DuplicateClusterId(id));
            }
            set.insert(id);
        }
        Ok(Self { ids: set })
    }

    /// Record ids of a representative FASTA in file order
    pub fn from_fasta<P: AsRef<Path>>(path: P) -> Result<Self> {
        let universe = Self::from_ids(fasta::fasta_ids(path.as_ref())?)?;
        tracing::debug!(
            "Loaded {} clusters from {}",
            universe.len(),
            path.as_ref().display()
        );
        Ok(universe)
    }

    /// Line-delimited id list, blank lines ignored
    pub fn from_list_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut ids = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let id = line.trim();
            if !id.is_empty() {
                ids.push(id.to_string());
            }
        }
        Self::from_ids(ids)
    }

    pub fn write_list<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_id_list(path, self.ids.iter())
    }

    pub fn ids(&self) -> impl ExactSizeIterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.get_index_of(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

/// Write one id per line
pub fn write_id_list<P, I, S>(path: P, ids: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    for id in ids {
        writeln!(writer, "{}", id.as_ref())?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a line-delimited name list, keeping order and duplicates
pub fn read_id_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut ids = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let id = line.trim();
        if !id.is_empty() {
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_order_preserved() {
        let universe = ClusterUniverse::from_ids(["c3", "c1", "c2"]).unwrap();
        assert_eq!(universe.ids().collect::<Vec<_>>(), vec!["c3", "c1", "c2"]);
        assert_eq!(universe.position("c1"), Some(1));
        assert!(universe.contains("c2"));
        assert!(!universe.contains("c4"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = ClusterUniverse::from_ids(["c1", "c2", "c1"]).unwrap_err();
        assert!(matches!(err, BsrError::DuplicateClusterId(ref id) if id == "c1"));
    }

    #[test]
    fn test_from_fasta_rejects_repeated_headers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("consensus.fasta");
        std::fs::write(&path, ">centroid_1\nATG\n>centroid_2\nGGC\n>centroid_1 copy\nTTT\n").unwrap();

        assert!(matches!(
            ClusterUniverse::from_fasta(&path),
            Err(BsrError::DuplicateClusterId(_))
        ));
    }

    #[test]
    fn test_list_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("clusters.txt");
        let universe = ClusterUniverse::from_ids(["b", "a"]).unwrap();

        universe.write_list(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "b\na\n");
        assert_eq!(ClusterUniverse::from_list_file(&path).unwrap(), universe);
    }
}
