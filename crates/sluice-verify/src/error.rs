use crate::Sha256Digest;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    Mismatch {
        expected: Sha256Digest,
        actual:   Sha256Digest,
    },

    #[error("invalid SHA-256 digest: {0}")]
    InvalidDigest(String),
}

pub type Result<T> = std::result::Result<T, VerificationError>;
