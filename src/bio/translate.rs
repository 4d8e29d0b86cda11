//! Nucleotide to peptide translation with the bacterial code (NCBI table 11)

use crate::bio::sequence::Sequence;

const BASES: &[u8; 4] = b"TCAG";
// Amino acids in TCAG x TCAG x TCAG order; table 11 shares table 1's sense codons
const AMINO_ACIDS: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

fn base_index(base: u8) -> Option<usize> {
    let base = match base.to_ascii_uppercase() {
        b'U' => b'T',
        other => other,
    };
    BASES.iter().position(|&b| b == base)
}

/// Translate one codon; codons with ambiguous bases become `X`
pub fn translate_codon(codon: &[u8; 3]) -> u8 {
    match (
        base_index(codon[0]),
        base_index(codon[1]),
        base_index(codon[2]),
    ) {
        (Some(a), Some(b), Some(c)) => AMINO_ACIDS[a * 16 + b * 4 + c],
        _ => b'X',
    }
}

/// Translate up to the first stop codon.
///
/// A trailing partial codon is dropped, so sequences whose length is not a
/// multiple of three are trimmed rather than rejected.
pub fn translate_to_stop(nucleotides: &[u8]) -> Vec<u8> {
    nucleotides
        .chunks_exact(3)
        .filter_map(|chunk| <&[u8; 3]>::try_from(chunk).ok())
        .map(translate_codon)
        .take_while(|&aa| aa != b'*')
        .collect()
}

/// Translation outcome for a gene set
#[derive(Debug, Default)]
pub struct TranslatedGenes {
    pub peptides: Vec<Sequence>,
    /// Genes whose peptide fell below the minimum length
    pub too_short: Vec<String>,
}

/// Translate every gene, keeping peptides of at least `min_length` residues
pub fn translate_genes(genes: &[Sequence], min_length: usize) -> TranslatedGenes {
    let mut result = TranslatedGenes::default();

    for gene in genes {
        let peptide = translate_to_stop(&gene.sequence);
        if peptide.len() >= min_length {
            result
                .peptides
                .push(Sequence::new(gene.id.clone(), peptide));
        } else {
            result.too_short.push(gene.id.clone());
        }
    }

    if !result.too_short.is_empty() {
        tracing::info!(
            "{} sequence(s) translated shorter than {} residues and will not be processed",
            result.too_short.len(),
            min_length
        );
    }
    result
}
