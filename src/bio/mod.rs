pub mod blast_tab;
pub mod fasta;
pub mod intergenic;
pub mod sequence;
pub mod translate;

pub use blast_tab::{AlignmentHit, HitReader};
pub use sequence::Sequence;
