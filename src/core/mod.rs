pub mod annotate;
pub mod clusters;
pub mod config;
pub mod counts;
pub mod duplicates;
pub mod executor;
pub mod matrix;
pub mod naming;
pub mod pangenome;
pub mod pipeline;
pub mod reducer;
pub mod reference;
pub mod stats;

pub use config::Config;
pub use matrix::BsrMatrix;
pub use reference::ReferenceScores;
