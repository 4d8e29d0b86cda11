#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl Sequence {
    pub fn new(id: String, sequence: Vec<u8>) -> Self {
        Self {
            id,
            description: None,
            sequence,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Whether the record carries an ambiguous base, i.e. spans a scaffold gap
    pub fn has_gap(&self) -> bool {
        self.sequence.iter().any(|&c| c == b'N' || c == b'n')
    }

    pub fn residues(&self) -> String {
        String::from_utf8_lossy(&self.sequence).to_string()
    }

    pub fn header(&self) -> String {
        match &self.description {
            Some(desc) => format!(">{} {}", self.id, desc),
            None => format!(">{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_with_and_without_description() {
        let plain = Sequence::new("centroid_1".to_string(), b"ATG".to_vec());
        assert_eq!(plain.header(), ">centroid_1");

        let described = plain.clone().with_description("hypothetical protein".to_string());
        assert_eq!(described.header(), ">centroid_1 hypothetical protein");
    }

    #[test]
    fn test_has_gap() {
        assert!(Sequence::new("s".to_string(), b"ACGTNNNACG".to_vec()).has_gap());
        assert!(!Sequence::new("s".to_string(), b"ACGTACG".to_vec()).has_gap());
    }
}
