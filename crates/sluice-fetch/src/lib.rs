//! HTTP downloading with streaming verification, decompression and atomic
//! placement.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - `core` and `transform` - Pure byte transformations
//! - `effects` - I/O operations behind the [`HttpClient`] trait
//!
//! # Pipeline
//!
//! A response body is read as a [`ChunkFetcher`], which hashes every chunk
//! and checks the SHA-256 once the body is exhausted. In streaming mode the
//! chunks are optionally gzip-decoded by [`GzipChunks`], exposed as a
//! [`Read`](std::io::Read) by [`IterStream`], and optionally decoded to text
//! by [`TextDecoder`]:
//!
//! ```text
//! response -> ChunkFetcher -> [GzipChunks] -> IterStream -> BufReader -> [TextDecoder] -> caller
//! ```
//!
//! In whole-file mode the chunks go to a staged file that is renamed over the
//! destination only after the digest has been checked.
//!
//! # Example
//!
//! ```no_run
//! use std::io::BufRead;
//! use sluice_fetch::{FetchOptions, StreamOptions};
//!
//! # fn main() -> Result<(), sluice_fetch::FetchError> {
//! let checksum = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9".parse()?;
//! sluice_fetch::download(
//!     "https://example.com/hello.txt",
//!     "hello.txt",
//!     &FetchOptions::default().checksum(Some(checksum)),
//! )?;
//!
//! let stream = sluice_fetch::download_stream(
//!     "https://example.com/corpus.tsv.gz",
//!     &StreamOptions::default().encoding("utf-8"),
//! )?;
//! for line in stream.lines() {
//!     println!("{}", line?);
//! }
//! # Ok(())
//! # }
//! ```

mod core;
pub mod data;
mod effects;
mod error;
mod tracker;
mod transform;

pub use self::core::{IterStream, is_gzip_url, resolve_encoding};
pub use data::{
    DEFAULT_BUFFER_SIZE, FetchOptions, FetchPhase, MAX_BUFFER_SIZE, Progress, ProgressCallback, StreamOptions,
};
pub use effects::{ChunkFetcher, DownloadStream, Fetcher, HttpClient, HttpResponse};
pub use error::{FetchError, Result};
pub use sluice_verify::Sha256Digest;
pub use transform::{GzipChunks, TextDecoder};

#[cfg(feature = "reqwest")]
pub use effects::{ClientSetting, ReqwestClient, Url};

#[cfg(feature = "reqwest")]
mod default_client {
    use std::path::{Path, PathBuf};

    use super::*;

    /// Download `url` to `destination` with a default [`ReqwestClient`].
    pub fn download(url: &str, destination: impl AsRef<Path>, options: &FetchOptions) -> Result<PathBuf> {
        Fetcher::new(ReqwestClient::new()?).download(url, destination, options)
    }

    /// [`Fetcher::download_if_needed`] with a default [`ReqwestClient`].
    pub fn download_if_needed(
        url: &str,
        destination: impl AsRef<Path>,
        options: &FetchOptions,
    ) -> Result<bool> {
        Fetcher::new(ReqwestClient::new()?).download_if_needed(url, destination, options)
    }

    /// [`Fetcher::download_stream`] with a default [`ReqwestClient`].
    pub fn download_stream(url: &str, options: &StreamOptions) -> Result<DownloadStream> {
        Fetcher::new(ReqwestClient::new()?).download_stream(url, options)
    }
}

#[cfg(feature = "reqwest")]
pub use default_client::{download, download_if_needed, download_stream};
