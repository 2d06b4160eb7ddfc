/// Hash algorithm identifiers.
///
/// TLS 1.3 cipher suites use SHA-256 or SHA-384 as the key-schedule hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlg {
    Sha256,
    Sha384,
}

impl HashAlg {
    /// Digest output length in bytes (32 for SHA-256, 48 for SHA-384).
    pub fn output_len(&self) -> usize {
        match self {
            HashAlg::Sha256 => 32,
            HashAlg::Sha384 => 48,
        }
    }
}
