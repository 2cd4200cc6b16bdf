use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use sluice_fs::{StageOptions, StagedFile};
use tracing::debug;

use crate::core::{IterStream, is_gzip_url, resolve_encoding};
use crate::data::{FetchOptions, FetchPhase, Progress, StreamOptions};
use crate::effects::chunks::{ChunkFetcher, validate};
use crate::effects::http::HttpClient;
use crate::error::{FetchError, Result};
use crate::transform::{GzipChunks, TextDecoder};

/// Downloads resources through an [`HttpClient`].
pub struct Fetcher<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self { Self { client } }

    pub fn client(&self) -> &C { &self.client }

    /// Send the request and return the response body as a chunk iterator.
    pub fn chunks(&self, url: &str, options: &FetchOptions) -> Result<ChunkFetcher> {
        validate(options)?;
        options.report(Progress {
            phase:            FetchPhase::Connecting,
            bytes_downloaded: 0,
            total_bytes:      None,
        });

        let response = self.client.get(url)?;
        ChunkFetcher::new(url, response, options)
    }

    /// Download `url` to `destination`.
    ///
    /// The body is written to a staging file beside the destination and
    /// renamed into place only after the last chunk has been written and the
    /// digest checked. On any failure the staging file is removed and an
    /// existing destination is left as it was.
    pub fn download(
        &self,
        url: &str,
        destination: impl AsRef<Path>,
        options: &FetchOptions,
    ) -> Result<PathBuf> {
        let destination = destination.as_ref();
        if destination.is_dir() {
            return Err(FetchError::DestinationIsDirectory(destination.to_path_buf()));
        }

        let mut chunks = self.chunks(url, options)?.defer_completion();
        let mut staged = StagedFile::new(destination, StageOptions::new())?;

        for chunk in &mut chunks {
            staged.write_all(&chunk?)?;
        }

        chunks.report(FetchPhase::Committing);
        let path = staged.commit()?;
        chunks.report(FetchPhase::Completed);

        Ok(path)
    }

    /// Download `url` to `destination` unless the destination already exists.
    ///
    /// An existing file is trusted as-is; its content is not verified. Returns
    /// whether a download took place.
    pub fn download_if_needed(
        &self,
        url: &str,
        destination: impl AsRef<Path>,
        options: &FetchOptions,
    ) -> Result<bool> {
        let destination = destination.as_ref();
        if destination.exists() {
            debug!(url, destination = %destination.display(), "already present, skipping download");
            return Ok(false);
        }

        self.download(url, destination, options)?;
        Ok(true)
    }

    /// Open `url` as a readable stream.
    ///
    /// A URL ending in `.gz` is decompressed on the fly unless
    /// [`StreamOptions::skip_gzip`] is set. With an encoding, the stream
    /// yields UTF-8 text decoded from that encoding.
    ///
    /// Integrity failures surface from `read` once the body is drained; use
    /// [`FetchError::from_io`] to recover them.
    pub fn download_stream(&self, url: &str, options: &StreamOptions) -> Result<DownloadStream> {
        let encoding = options.encoding.as_deref().map(resolve_encoding).transpose()?;
        let buffer_size = options.fetch.buffer_size;
        let chunks = self.chunks(url, &options.fetch)?;

        let decompressed = is_gzip_url(url) && !options.skip_gzip;
        let bytes: Box<dyn BufRead + Send> = if decompressed {
            Box::new(BufReader::with_capacity(buffer_size, IterStream::new(GzipChunks::new(chunks))))
        } else {
            Box::new(BufReader::with_capacity(buffer_size, IterStream::new(chunks)))
        };

        let inner: Box<dyn BufRead + Send> = match encoding {
            Some(encoding) => Box::new(BufReader::with_capacity(buffer_size, TextDecoder::new(bytes, encoding))),
            None => bytes,
        };

        Ok(DownloadStream {
            inner,
            encoding,
            decompressed,
        })
    }
}

/// A live download exposed as a buffered byte stream.
///
/// When opened with an encoding, the bytes are UTF-8 text, so
/// [`BufRead::lines`] and [`Read::read_to_string`] apply directly.
pub struct DownloadStream {
    inner:        Box<dyn BufRead + Send>,
    encoding:     Option<&'static Encoding>,
    decompressed: bool,
}

impl DownloadStream {
    /// Source encoding being decoded to UTF-8, if any.
    pub fn encoding(&self) -> Option<&'static Encoding> { self.encoding }

    /// Whether gzip decompression was inserted into the pipeline.
    pub fn is_decompressed(&self) -> bool { self.decompressed }
}

impl fmt::Debug for DownloadStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadStream")
            .field("encoding", &self.encoding.map(Encoding::name))
            .field("decompressed", &self.decompressed)
            .finish_non_exhaustive()
    }
}

impl Read for DownloadStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> { self.inner.read(buf) }
}

impl BufRead for DownloadStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> { self.inner.fill_buf() }

    fn consume(&mut self, amt: usize) { self.inner.consume(amt) }
}
