use std::fmt;
use std::sync::Arc;

use sluice_verify::Sha256Digest;

use super::progress::Progress;

/// Default chunk size, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Largest accepted chunk size, in bytes.
pub const MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;

pub type ProgressCallback = Arc<dyn Fn(&Progress) + Send + Sync>;

/// Phases of a download operation.
///
/// Downloads progress through these phases in order:
/// Connecting → Downloading → Verifying → Committing → Completed
///
/// Streaming downloads skip Committing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Request sent, waiting for the response.
    #[default]
    Connecting,

    /// Streaming chunks from the response body.
    Downloading,

    /// Body exhausted; the digest is being finalized and compared.
    Verifying,

    /// Moving the staged file to its final destination.
    Committing,

    /// Download completed successfully.
    Completed,
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchPhase::Connecting => write!(f, "Connecting"),
            FetchPhase::Downloading => write!(f, "Downloading"),
            FetchPhase::Verifying => write!(f, "Verifying"),
            FetchPhase::Committing => write!(f, "Committing"),
            FetchPhase::Completed => write!(f, "Completed"),
        }
    }
}

/// Configuration for fetching a single resource.
///
/// # Examples
///
/// ```
/// use sluice_fetch::data::FetchOptions;
///
/// let options = FetchOptions::default()
///     .checksum(Some(
///         "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9".parse().unwrap(),
///     ))
///     .buffer_size(64 * 1024)
///     .show_progress(false);
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Expected SHA-256 of the response body.
    ///
    /// When set, a mismatch fails the download after the last chunk. When
    /// unset, the computed digest is logged as a warning instead.
    pub checksum: Option<Sha256Digest>,

    /// Maximum chunk size read from the response body, at most
    /// [`MAX_BUFFER_SIZE`].
    ///
    /// Default: 8 KiB
    pub buffer_size: usize,

    /// Draw a terminal progress bar on stderr.
    ///
    /// Default: true
    pub show_progress: bool,

    /// Callback invoked on phase transitions and after every chunk.
    ///
    /// Default: None
    pub on_progress: Option<ProgressCallback>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("checksum", &self.checksum)
            .field("buffer_size", &self.buffer_size)
            .field("show_progress", &self.show_progress)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            checksum: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            show_progress: true,
            on_progress: None,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn checksum(mut self, checksum: Option<Sha256Digest>) -> Self {
        self.checksum = checksum;
        self
    }

    #[must_use]
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    #[must_use]
    pub fn show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Set the progress callback.
    ///
    /// # Examples
    ///
    /// ```
    /// use sluice_fetch::data::{FetchOptions, FetchPhase, Progress};
    /// use std::sync::Arc;
    ///
    /// let options = FetchOptions::default()
    ///     .on_progress(Arc::new(|progress: &Progress| {
    ///         match progress.phase {
    ///             FetchPhase::Downloading => {
    ///                 if let Some(pct) = progress.percentage() {
    ///                     println!("Progress: {:.1}%", pct);
    ///                 }
    ///             }
    ///             FetchPhase::Completed => println!("Done!"),
    ///             _ => {}
    ///         }
    ///     }));
    /// ```
    #[must_use]
    pub fn on_progress(mut self, on_progress: ProgressCallback) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    pub(crate) fn report(&self, progress: Progress) {
        if let Some(ref callback) = self.on_progress {
            callback(&progress);
        }
    }
}

/// Configuration for [`download_stream`](crate::Fetcher::download_stream).
#[derive(Debug, Clone, Default)]
pub struct StreamOptions {
    pub fetch: FetchOptions,

    /// Decode the bytes with this encoding label (`"utf-8"`, `"latin1"`, ...).
    pub encoding: Option<String>,

    /// Do not decompress even when the URL ends in `.gz`.
    pub skip_gzip: bool,
}

impl StreamOptions {
    #[must_use]
    pub fn fetch(mut self, fetch: FetchOptions) -> Self {
        self.fetch = fetch;
        self
    }

    #[must_use]
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    #[must_use]
    pub fn skip_gzip(mut self, skip_gzip: bool) -> Self {
        self.skip_gzip = skip_gzip;
        self
    }
}
