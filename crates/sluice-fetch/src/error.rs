//! Error types for sluice-fetch.

use std::io;
use std::path::PathBuf;

use sluice_verify::{Sha256Digest, VerificationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("expected {url} to have SHA-256 hash {expected} but got {actual}")]
    Integrity {
        url:      String,
        expected: Sha256Digest,
        actual:   Sha256Digest,
    },

    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Fs(#[from] sluice_fs::Error),

    #[error(transparent)]
    Verify(#[from] VerificationError),

    #[error("destination path is a directory: {}", .0.display())]
    DestinationIsDirectory(PathBuf),

    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("invalid options: {0}")]
    InvalidOptions(&'static str),
}

impl FetchError {
    /// Recover a `FetchError` that crossed an `io::Read` boundary.
    pub fn from_io(err: &io::Error) -> Option<&FetchError> {
        err.get_ref().and_then(|e| e.downcast_ref::<FetchError>())
    }

    pub fn is_integrity(&self) -> bool { matches!(self, FetchError::Integrity { .. }) }
}

impl From<FetchError> for io::Error {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Io(e) => e,
            FetchError::Integrity { .. } => io::Error::new(io::ErrorKind::InvalidData, err),
            other => io::Error::other(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
