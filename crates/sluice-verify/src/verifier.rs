use crate::{Hasher, Result, Sha256Digest, VerificationError};

/// Result of a successful [`Verifier::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The digest matched the expected value.
    Verified(Sha256Digest),
    /// No expected value was supplied; the digest is reported for future use.
    Unchecked(Sha256Digest),
}

impl Outcome {
    pub fn digest(&self) -> Sha256Digest {
        match self {
            Outcome::Verified(d) | Outcome::Unchecked(d) => *d,
        }
    }

    pub fn is_verified(&self) -> bool { matches!(self, Outcome::Verified(_)) }
}

/// Running hash over a byte stream, checked once the stream is exhausted.
pub struct Verifier<H> {
    hasher: H,
    bytes:  u64,
}

impl<H: Hasher<Output = Sha256Digest>> Verifier<H> {
    pub fn new(hasher: H) -> Self { Self { hasher, bytes: 0 } }

    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.bytes += data.len() as u64;
    }

    /// Number of bytes hashed so far.
    pub fn bytes(&self) -> u64 { self.bytes }

    /// Finalize the digest and compare it against `expected`.
    ///
    /// Consumes the verifier, so the digest is computed exactly once.
    pub fn finish(self, expected: Option<&Sha256Digest>) -> Result<Outcome> {
        let actual = self.hasher.finalize();
        match expected {
            None => Ok(Outcome::Unchecked(actual)),
            Some(expected) if *expected == actual => Ok(Outcome::Verified(actual)),
            Some(expected) => Err(VerificationError::Mismatch {
                expected: *expected,
                actual,
            }),
        }
    }
}
