//! Chunk-by-chunk gzip decompression.

use std::io::{self, Write};

use bytes::Bytes;
use flate2::write::GzDecoder;
use tracing::debug;

/// Decompresses a chunked gzip stream into chunks of plain bytes.
///
/// Every input chunk is pushed through a streaming decoder that parses and
/// skips the gzip header itself. Chunks that produce no output (a header-only
/// chunk, for instance) are skipped rather than yielded empty. When the input
/// ends the decoder is finished, which checks the gzip trailer.
///
/// Only the first gzip member is decoded; anything after it is ignored.
pub struct GzipChunks<I> {
    inner:   I,
    decoder: Option<GzDecoder<Vec<u8>>>,
    fed:     bool,
}

impl<I> GzipChunks<I> {
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            decoder: Some(GzDecoder::new(Vec::new())),
            fed: false,
        }
    }
}

impl<I, B, E> Iterator for GzipChunks<I>
where
    I: Iterator<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: From<io::Error>,
{
    type Item = Result<Bytes, E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let decoder = self.decoder.as_mut()?;
            match self.inner.next() {
                Some(Ok(chunk)) => {
                    let chunk = chunk.as_ref();
                    self.fed |= !chunk.is_empty();
                    match feed(decoder, chunk) {
                        Ok(out) if out.is_empty() => continue,
                        Ok(out) => return Some(Ok(out)),
                        Err(e) => {
                            self.decoder = None;
                            return Some(Err(e.into()));
                        }
                    }
                }
                Some(Err(e)) => {
                    self.decoder = None;
                    return Some(Err(e));
                }
                None => {
                    let mut decoder = self.decoder.take()?;
                    if !self.fed {
                        return None;
                    }
                    if let Err(e) = decoder.try_finish() {
                        return Some(Err(e.into()));
                    }
                    let out = std::mem::take(decoder.get_mut());
                    return (!out.is_empty()).then(|| Ok(Bytes::from(out)));
                }
            }
        }
    }
}

fn feed(decoder: &mut GzDecoder<Vec<u8>>, mut input: &[u8]) -> io::Result<Bytes> {
    while !input.is_empty() {
        let n = decoder.write(input)?;
        if n == 0 {
            debug!(ignored = input.len(), "ignoring bytes after end of gzip stream");
            break;
        }
        input = &input[n..];
    }
    decoder.flush()?;
    Ok(Bytes::from(std::mem::take(decoder.get_mut())))
}
