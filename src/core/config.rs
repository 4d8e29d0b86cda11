use crate::core::counts::CountThresholds;
use crate::core::duplicates::DuplicateScope;
use crate::core::executor::FailurePolicy;
use crate::core::naming::GenomeNaming;
use crate::BsrError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub matrix: MatrixConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub sequences: SequenceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdConfig {
    /// Copies at or below this fraction of the best copy mark a paralog
    #[serde(default = "default_max_plog")]
    pub max_plog: f64,
    /// Minimum percent identity for a hit to count
    #[serde(default = "default_min_hlog")]
    pub min_hlog: f64,
    /// Minimum hit/self score ratio for a hit to count
    #[serde(default = "default_length")]
    pub length: f64,
    #[serde(default)]
    pub duplicate_scope: DuplicateScope,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatrixConfig {
    /// BSR value at which a cluster is called present
    #[serde(default = "default_upper")]
    pub upper: f64,
    /// BSR value below which a cluster is called absent
    #[serde(default = "default_lower")]
    pub lower: f64,
    /// Decimal places in written value matrices
    #[serde(default = "default_precision")]
    pub precision: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    /// Worker count, 0 for all cores
    #[serde(default)]
    pub processors: usize,
    #[serde(default = "default_on_parse_failure")]
    pub on_parse_failure: FailurePolicy,
    #[serde(default = "default_on_tool_failure")]
    pub on_tool_failure: FailurePolicy,
    #[serde(default = "default_genome_pattern")]
    pub genome_pattern: String,
    #[serde(default = "default_genome_suffix")]
    pub genome_suffix: String,
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SequenceConfig {
    /// Genes shorter than this are dropped before clustering
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Minimum translated peptide length
    #[serde(default = "default_min_length")]
    pub min_peptide_length: usize,
    /// Intergenic regions must be longer than this
    #[serde(default = "default_min_length")]
    pub min_intergenic_length: usize,
}

// Default value functions
fn default_max_plog() -> f64 { 0.85 }
fn default_min_hlog() -> f64 { -1.0 }
fn default_length() -> f64 { 0.7 }
fn default_upper() -> f64 { 0.8 }
fn default_lower() -> f64 { 0.4 }
fn default_precision() -> usize { 2 }
fn default_on_parse_failure() -> FailurePolicy { FailurePolicy::Abort }
fn default_on_tool_failure() -> FailurePolicy { FailurePolicy::Skip }
fn default_genome_pattern() -> String { GenomeNaming::default().pattern }
fn default_genome_suffix() -> String { GenomeNaming::default().suffix }
fn default_show_progress() -> bool { true }
fn default_min_length() -> usize { 50 }

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            max_plog: default_max_plog(),
            min_hlog: default_min_hlog(),
            length: default_length(),
            duplicate_scope: DuplicateScope::default(),
        }
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            upper: default_upper(),
            lower: default_lower(),
            precision: default_precision(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            processors: 0,
            on_parse_failure: default_on_parse_failure(),
            on_tool_failure: default_on_tool_failure(),
            genome_pattern: default_genome_pattern(),
            genome_suffix: default_genome_suffix(),
            show_progress: default_show_progress(),
        }
    }
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            min_peptide_length: default_min_length(),
            min_intergenic_length: default_min_length(),
        }
    }
}

impl ThresholdConfig {
    pub fn count_thresholds(&self) -> CountThresholds {
        CountThresholds {
            min_hlog: self.min_hlog,
            length: self.length,
        }
    }
}

impl PipelineConfig {
    pub fn naming(&self) -> GenomeNaming {
        GenomeNaming::new(self.genome_pattern.clone(), self.genome_suffix.clone())
    }
}

impl Config {
    /// Reject values no run could use
    pub fn validate(&self) -> Result<(), BsrError> {
        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.max_plog) {
            return Err(BsrError::Config(format!(
                "max_plog must be within 0 and 1, got {}",
                t.max_plog
            )));
        }
        if t.length < 0.0 {
            return Err(BsrError::Config(format!("length must not be negative, got {}", t.length)));
        }
        if self.matrix.lower > self.matrix.upper {
            return Err(BsrError::Config(format!(
                "lower threshold {} is above upper threshold {}",
                self.matrix.lower, self.matrix.upper
            )));
        }
        if self.pipeline.genome_suffix.is_empty() {
            return Err(BsrError::Config("genome_suffix must not be empty".to_string()));
        }
        Ok(())
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, BsrError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| BsrError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), BsrError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| BsrError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
