/// Failures from the hash/HKDF collaborators.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("hkdf: pseudorandom key too short")]
    HkdfPrkTooShort,
    #[error("hkdf: derived key length overflow")]
    KdfDkLenOverflow,
    #[error("hmac: invalid key")]
    HmacInvalidKey,
}

/// Key-schedule errors.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("secret already initialized")]
    AlreadyInitialized,
    #[error("key schedule stage out of order: {0}")]
    StageViolation(&'static str),
    #[error("extracted secret length mismatch: expected {expected}, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("hkdf label field exceeds 255 bytes")]
    LabelOverflow,
    #[error("reserved label for key export: {0}")]
    ReservedExportLabel(String),
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
