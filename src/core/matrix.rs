//! Cluster-by-genome matrix
//!
//! On disk a matrix is tab-separated: a header row holding the corner cell and
//! the genome labels, then one row per cluster holding the cluster id and one
//! value per genome. Readers also accept headers that omit the corner cell.

use crate::core::clusters::ClusterUniverse;
use crate::core::reference::ReferenceScores;
use crate::{BsrError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// One genome's values aligned to the cluster universe
#[derive(Debug, Clone, PartialEq)]
pub struct GenomeColumn {
    pub label: String,
    pub values: Vec<f64>,
}

impl GenomeColumn {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BsrMatrix {
    corner: String,
    clusters: Vec<String>,
    genomes: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl BsrMatrix {
    /// Build a matrix, checking that every row has one value per genome and
    /// that row and column ids are unique
    pub fn new(
        corner: impl Into<String>,
        clusters: Vec<String>,
        genomes: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if clusters.len() != rows.len() {
            return Err(BsrError::MatrixShape(format!(
                "{} cluster ids but {} rows",
                clusters.len(),
                rows.len()
            )));
        }
        if let Some((cluster, row)) = clusters
            .iter()
            .zip(&rows)
            .find(|(_, row)| row.len() != genomes.len())
        {
            return Err(BsrError::MatrixShape(format!(
                "row {} has {} values for {} genomes",
                cluster,
                row.len(),
                genomes.len()
            )));
        }
        if let Some(dup) = first_repeat(&genomes) {
            return Err(BsrError::DuplicateGenomeLabel(dup.to_string()));
        }
        if let Some(dup) = first_repeat(&clusters) {
            return Err(BsrError::DuplicateClusterId(dup.to_string()));
        }

        Ok(Self {
            corner: corner.into(),
            clusters,
            genomes,
            rows,
        })
    }

    /// Paste genome columns side by side, rows in universe order.
    ///
    /// Columns are ordered by genome label so worker completion order never
    /// shows up in the output.
    pub fn assemble(universe: &ClusterUniverse, mut columns: Vec<GenomeColumn>) -> Result<Self> {
        columns.sort_by(|a, b| a.label.cmp(&b.label));

        for column in &columns {
            if column.values.len() != universe.len() {
                return Err(BsrError::MatrixShape(format!(
                    "genome {} has {} values for {} clusters",
                    column.label,
                    column.values.len(),
                    universe.len()
                )));
            }
        }

        let genomes: Vec<String> = columns.iter().map(|c| c.label.clone()).collect();
        let rows = (0..universe.len())
            .map(|i| columns.iter().map(|c| c.values[i]).collect())
            .collect();

        Self::new("", universe.ids().map(String::from).collect(), genomes, rows)
    }

    pub fn with_corner(mut self, corner: impl Into<String>) -> Self {
        self.corner = corner.into();
        self
    }

    pub fn corner(&self) -> &str {
        &self.corner
    }

    pub fn clusters(&self) -> &[String] {
        &self.clusters
    }

    pub fn genomes(&self) -> &[String] {
        &self.genomes
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_clusters(&self) -> usize {
        self.clusters.len()
    }

    pub fn n_genomes(&self) -> usize {
        self.genomes.len()
    }

    pub fn row(&self, cluster: &str) -> Option<&[f64]> {
        let idx = self.clusters.iter().position(|c| c == cluster)?;
        Some(&self.rows[idx])
    }

    pub fn get(&self, cluster: &str, genome: &str) -> Option<f64> {
        let col = self.genomes.iter().position(|g| g == genome)?;
        self.row(cluster).map(|row| row[col])
    }

    /// Iterate `(cluster, values)` pairs in row order
    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.clusters
            .iter()
            .zip(&self.rows)
            .map(|(c, r)| (c.as_str(), r.as_slice()))
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let mut lines = reader.lines().enumerate();

        let header = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    if !line.trim_end_matches('\r').is_empty() {
                        break line;
                    }
                }
                None => return Err(BsrError::malformed(path, 1, "empty matrix file")),
            }
        };
        let header: Vec<String> = header
            .trim_end_matches(['\n', '\r'])
            .split('\t')
            .map(|f| f.trim().to_string())
            .collect();

        let mut clusters = Vec::new();
        let mut rows = Vec::new();
        for (idx, line) in lines {
            let line = line?;
            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split('\t');
            let cluster = fields.next().unwrap_or_default().trim().to_string();
            let values = fields
                .map(|f| {
                    f.trim().parse::<f64>().map_err(|_| {
                        BsrError::malformed(path, idx + 1, format!("invalid value '{}'", f))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            clusters.push(cluster);
            rows.push(values);
        }

        let width = rows.first().map(Vec::len);
        let (corner, genomes) = match width {
            Some(n) if header.len() == n + 1 => (header[0].clone(), header[1..].to_vec()),
            Some(n) if header.len() == n => (String::new(), header),
            Some(n) => {
                return Err(BsrError::MatrixShape(format!(
                    "{}: header has {} fields for {} values per row",
                    path.display(),
                    header.len(),
                    n
                )))
            }
            None => (header[0].clone(), header[1..].to_vec()),
        };
        if genomes.is_empty() || genomes.iter().any(String::is_empty) {
            return Err(BsrError::MatrixShape(format!(
                "{}: header names no genome columns",
                path.display()
            )));
        }

        Self::new(corner, clusters, genomes, rows)
    }

    /// Write with values in shortest form
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_with_precision(path, None)
    }

    pub fn write_with_precision<P: AsRef<Path>>(&self, path: P, precision: Option<usize>) -> Result<()> {
        self.ensure_columns()?;
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, precision)?;
        writer.flush()?;
        Ok(())
    }

    /// A matrix without genome columns has no readable header
    pub fn write_to<W: Write>(&self, writer: &mut W, precision: Option<usize>) -> Result<()> {
        self.ensure_columns()?;
        writeln!(writer, "{}\t{}", self.corner, self.genomes.join("\t"))?;
        for (cluster, row) in self.iter_rows() {
            let values: Vec<String> = row.iter().map(|&v| format_value(v, precision)).collect();
            writeln!(writer, "{}\t{}", cluster, values.join("\t"))?;
        }
        Ok(())
    }

    fn ensure_columns(&self) -> Result<()> {
        if self.genomes.is_empty() {
            return Err(BsrError::MatrixShape("matrix has no genome columns".to_string()));
        }
        Ok(())
    }

    /// Genomes become rows and clusters become columns
    pub fn transpose(&self) -> Self {
        let rows = (0..self.n_genomes())
            .map(|col| self.rows.iter().map(|row| row[col]).collect())
            .collect();
        Self {
            corner: self.corner.clone(),
            clusters: self.genomes.clone(),
            genomes: self.clusters.clone(),
            rows,
        }
    }

    /// Keep only the listed genomes, in matrix column order
    pub fn select_genomes(&self, names: &[String]) -> Result<Self> {
        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        for name in &wanted {
            if !self.genomes.iter().any(|g| g == name) {
                tracing::warn!("Genome {} is not in the matrix", name);
            }
        }

        let selected = self.filter_columns(|g| wanted.contains(g));
        if selected.n_genomes() == 0 {
            return Err(BsrError::InvalidInput(
                "none of the requested genomes are in the matrix".to_string(),
            ));
        }
        Ok(selected)
    }

    pub fn remove_genomes(&self, names: &[String]) -> Self {
        let unwanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        self.filter_columns(|g| !unwanted.contains(g))
    }

    fn filter_columns<F: Fn(&str) -> bool>(&self, keep: F) -> Self {
        let kept: Vec<usize> = self
            .genomes
            .iter()
            .enumerate()
            .filter(|(_, g)| keep(g))
            .map(|(i, _)| i)
            .collect();

        Self {
            corner: self.corner.clone(),
            clusters: self.clusters.clone(),
            genomes: kept.iter().map(|&i| self.genomes[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| kept.iter().map(|&i| row[i]).collect())
                .collect(),
        }
    }

    /// Keep rows for which `keep(cluster, values)` holds
    pub fn retain_clusters<F: Fn(&str, &[f64]) -> bool>(&self, keep: F) -> Self {
        let (clusters, rows) = self
            .iter_rows()
            .filter(|(c, r)| keep(c, r))
            .map(|(c, r)| (c.to_string(), r.to_vec()))
            .unzip();
        Self {
            corner: self.corner.clone(),
            clusters,
            genomes: self.genomes.clone(),
            rows,
        }
    }

    pub fn remove_clusters(&self, ids: &[String]) -> Self {
        let unwanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        self.retain_clusters(|c, _| !unwanted.contains(c))
    }

    /// Clusters absent (below `threshold`) from more than `step` genomes
    pub fn variome(&self, threshold: f64, step: usize) -> Self {
        let limit = self.n_genomes().saturating_sub(step);
        self.retain_clusters(|_, row| present_in(row, threshold) < limit)
    }

    /// Rows in the order of `names`; unknown names are skipped
    pub fn reorder_clusters(&self, names: &[String]) -> Self {
        let mut clusters = Vec::new();
        let mut rows = Vec::new();
        let mut seen = HashSet::new();

        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            match self.row(name) {
                Some(row) => {
                    clusters.push(name.clone());
                    rows.push(row.to_vec());
                }
                None => tracing::warn!("{} is not a row of the matrix", name),
            }
        }

        Self {
            corner: self.corner.clone(),
            clusters,
            genomes: self.genomes.clone(),
            rows,
        }
    }

    /// Divide every row by its cluster's self score
    pub fn normalize(&self, refs: &ReferenceScores, source: &Path) -> Result<Self> {
        let rows = self
            .iter_rows()
            .map(|(cluster, row)| {
                let denominator = refs.score(cluster, source)?;
                Ok(row.iter().map(|v| v / denominator).collect())
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        Ok(Self {
            corner: self.corner.clone(),
            clusters: self.clusters.clone(),
            genomes: self.genomes.clone(),
            rows,
        })
    }

    /// Presence matrix: `1` where the value reaches `lower`, `-` otherwise
    pub fn write_presence<P: AsRef<Path>>(&self, path: P, lower: f64) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{}\t{}", self.corner, self.genomes.join("\t"))?;
        for (cluster, row) in self.iter_rows() {
            let cells: Vec<&str> = row
                .iter()
                .map(|&v| if v >= lower { "1" } else { "-" })
                .collect();
            writeln!(writer, "{}\t{}", cluster, cells.join("\t"))?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Number of genomes whose value reaches `threshold`
pub fn present_in(row: &[f64], threshold: f64) -> usize {
    row.iter().filter(|&&v| v >= threshold).count()
}

pub fn format_value(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(p) => format!("{:.*}", p, value),
        None => format!("{}", value),
    }
}

fn first_repeat(ids: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter()
        .find(|id| !seen.insert(id.as_str()))
        .map(String::as_str)
}
