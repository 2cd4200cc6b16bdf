use sha2::Digest;

use crate::Sha256Digest;

/// Incremental hash accumulator.
pub trait Hasher: Send {
    type Output;

    fn update(&mut self, data: &[u8]);
    fn finalize(self) -> Self::Output;
}

pub struct Sha256Hasher(sha2::Sha256);

impl Hasher for Sha256Hasher {
    type Output = Sha256Digest;

    fn update(&mut self, data: &[u8]) { self.0.update(data); }

    fn finalize(self) -> Sha256Digest { Sha256Digest::from_bytes(self.0.finalize().into()) }
}

impl Default for Sha256Hasher {
    fn default() -> Self { Self::new() }
}

impl Sha256Hasher {
    pub fn new() -> Self { Self(sha2::Sha256::new()) }

    pub fn digest(data: &[u8]) -> Sha256Digest {
        Sha256Digest::from_bytes(sha2::Sha256::digest(data).into())
    }
}
