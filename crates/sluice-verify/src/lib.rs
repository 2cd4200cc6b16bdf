//! Incremental SHA-256 verification for streamed downloads.
//!
//! Bytes are hashed as they pass through a [`Verifier`]; once the stream is
//! exhausted the digest is finalized exactly once and compared against an
//! optional expected value.
//!
//! # Example
//!
//! ```
//! use sluice_verify::{Sha256Digest, Sha256Hasher, Verifier};
//!
//! let expected: Sha256Digest =
//!     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9".parse().unwrap();
//!
//! let mut verifier = Verifier::new(Sha256Hasher::new());
//! verifier.update(b"hello ");
//! verifier.update(b"world");
//!
//! let outcome = verifier.finish(Some(&expected)).unwrap();
//! assert!(outcome.is_verified());
//! ```

pub use self::digest::Sha256Digest;
pub use self::error::{Result, VerificationError};
pub use self::hasher::{Hasher, Sha256Hasher};
pub use self::verifier::{Outcome, Verifier};

mod digest;
mod error;
mod hasher;
mod verifier;
