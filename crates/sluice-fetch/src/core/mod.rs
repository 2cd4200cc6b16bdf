//! Pure transformations for streamed downloads.
//!
//! Nothing in this module performs network or filesystem I/O; the types here
//! only reshape bytes that some upstream stage already produced.

mod stream;

pub use stream::IterStream;

use encoding_rs::Encoding;

use crate::error::{FetchError, Result};

/// Returns `true` if the URL names a gzip-framed resource.
///
/// Detection is by the literal `.gz` suffix only; content types are not
/// consulted.
///
/// # Examples
///
/// ```
/// use sluice_fetch::is_gzip_url;
///
/// assert!(is_gzip_url("https://example.com/data/corpus.jsonl.gz"));
/// assert!(!is_gzip_url("https://example.com/data/corpus.jsonl"));
/// assert!(!is_gzip_url("https://example.com/corpus.gz?raw=1"));
/// ```
pub fn is_gzip_url(url: &str) -> bool { url.ends_with(".gz") }

/// Look up a text encoding by its WHATWG label (`"utf-8"`, `"latin1"`, ...).
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| FetchError::UnknownEncoding(label.to_string()))
}
