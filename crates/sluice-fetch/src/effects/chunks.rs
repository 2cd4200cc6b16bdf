use std::io::{self, Read};
use std::time::Instant;

use bytes::Bytes;
use sluice_verify::{Outcome, Sha256Digest, Sha256Hasher, VerificationError, Verifier};
use tracing::{debug, trace, warn};

use crate::data::{FetchOptions, FetchPhase, MAX_BUFFER_SIZE, Progress, ProgressCallback};
use crate::effects::http::HttpResponse;
use crate::error::{FetchError, Result};
use crate::tracker::{ProgressTracker, ProgressTrackerConfig};

/// A response body read as a lazy sequence of chunks.
///
/// Every chunk is `buffer_size` bytes long except possibly the last. Each
/// chunk advances the progress bar and the running SHA-256 before it is
/// yielded. Once the body is exhausted the digest is finalized: a mismatch
/// with the expected digest is yielded as a final
/// [`FetchError::Integrity`], after every byte has already been handed out.
/// Without an expected digest the computed one is logged as a warning.
///
/// The iterator is fused after its last item or after any error.
pub struct ChunkFetcher {
    url:              String,
    body:             Box<dyn Read + Send>,
    buffer_size:      usize,
    verifier:         Option<Verifier<Sha256Hasher>>,
    expected:         Option<Sha256Digest>,
    tracker:          ProgressTracker,
    on_progress:      Option<ProgressCallback>,
    total_bytes:      Option<u64>,
    bytes_downloaded: u64,
    started:          Instant,
    defer_completion: bool,
}

pub(crate) fn validate(options: &FetchOptions) -> Result<()> {
    if options.buffer_size == 0 {
        return Err(FetchError::InvalidOptions("buffer size must be greater than zero"));
    }
    if options.buffer_size > MAX_BUFFER_SIZE {
        return Err(FetchError::InvalidOptions("buffer size must not exceed 16 MiB"));
    }
    Ok(())
}

impl ChunkFetcher {
    pub fn new(url: impl Into<String>, response: HttpResponse, options: &FetchOptions) -> Result<Self> {
        validate(options)?;
        let url = url.into();

        let tracker = ProgressTracker::new(ProgressTrackerConfig {
            len:    response.content_length,
            msg:    Some(url.clone()),
            hidden: !options.show_progress,
        });

        Ok(Self {
            url,
            body: response.body,
            buffer_size: options.buffer_size,
            verifier: Some(Verifier::new(Sha256Hasher::new())),
            expected: options.checksum,
            tracker,
            on_progress: options.on_progress.clone(),
            total_bytes: response.content_length,
            bytes_downloaded: 0,
            started: Instant::now(),
            defer_completion: false,
        })
    }

    /// Content-Length of the response, if the server sent one.
    pub fn total_bytes(&self) -> Option<u64> { self.total_bytes }

    pub fn bytes_downloaded(&self) -> u64 { self.bytes_downloaded }

    /// Leave the `Completed` report to the caller, which still has work to do
    /// after the last chunk.
    pub(crate) fn defer_completion(mut self) -> Self {
        self.defer_completion = true;
        self
    }

    pub(crate) fn report(&self, phase: FetchPhase) {
        if let Some(ref callback) = self.on_progress {
            callback(&Progress {
                phase,
                bytes_downloaded: self.bytes_downloaded,
                total_bytes: self.total_bytes,
            });
        }
    }

    fn read_chunk(&mut self) -> io::Result<Vec<u8>> {
        let mut chunk = Vec::with_capacity(self.buffer_size);
        (&mut self.body).take(self.buffer_size as u64).read_to_end(&mut chunk)?;
        Ok(chunk)
    }

    fn finalize(&mut self, verifier: Verifier<Sha256Hasher>) -> Result<()> {
        self.report(FetchPhase::Verifying);

        let outcome = match verifier.finish(self.expected.as_ref()) {
            Ok(outcome) => outcome,
            Err(VerificationError::Mismatch { expected, actual }) => {
                self.tracker.abandon();
                return Err(FetchError::Integrity {
                    url: self.url.clone(),
                    expected,
                    actual,
                });
            }
            Err(e) => {
                self.tracker.abandon();
                return Err(e.into());
            }
        };

        match outcome {
            Outcome::Verified(_) => self.tracker.finish(Some("sha256 hash verified")),
            Outcome::Unchecked(digest) => {
                self.tracker.finish(None);
                warn!(
                    url = %self.url,
                    "no hash provided for {}; consider adding expected sha256 \"{digest}\" to ensure data integrity",
                    self.url
                );
            }
        }

        debug!(
            url = %self.url,
            bytes = self.bytes_downloaded,
            elapsed = ?self.started.elapsed(),
            sha256 = %outcome.digest(),
            "downloaded"
        );

        if !self.defer_completion {
            self.report(FetchPhase::Completed);
        }
        Ok(())
    }
}

impl Iterator for ChunkFetcher {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.verifier.is_none() {
            return None;
        }

        let chunk = match self.read_chunk() {
            Ok(chunk) => chunk,
            Err(e) => {
                self.verifier = None;
                self.tracker.abandon();
                return Some(Err(e.into()));
            }
        };

        if chunk.is_empty() {
            let verifier = self.verifier.take()?;
            return self.finalize(verifier).err().map(Err);
        }

        if let Some(verifier) = self.verifier.as_mut() {
            verifier.update(&chunk);
        }
        self.bytes_downloaded += chunk.len() as u64;
        self.tracker.step(chunk.len() as u64);
        trace!(url = %self.url, len = chunk.len(), total = self.bytes_downloaded, "chunk");
        self.report(FetchPhase::Downloading);

        Some(Ok(Bytes::from(chunk)))
    }
}

impl Drop for ChunkFetcher {
    fn drop(&mut self) {
        if self.verifier.is_some() {
            self.tracker.abandon();
        }
    }
}
