//! Text decoding of byte streams.

use std::io::{self, BufRead, Read};

use encoding_rs::{Decoder, DecoderResult, Encoding};

/// Decodes a byte stream in a given encoding, yielding UTF-8.
///
/// The requested encoding is used as-is; a byte order mark is not sniffed.
/// Malformed input is an [`io::ErrorKind::InvalidData`] error, returned once
/// the text decoded before it has been read.
pub struct TextDecoder<R> {
    inner:     R,
    encoding:  &'static Encoding,
    decoder:   Decoder,
    out:       Vec<u8>,
    pos:       usize,
    eof:       bool,
    malformed: bool,
}

impl<R: BufRead> TextDecoder<R> {
    pub fn new(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            decoder: encoding.new_decoder_without_bom_handling(),
            out: Vec::new(),
            pos: 0,
            eof: false,
            malformed: false,
        }
    }

    /// Decode the next block of input into `out`. Returns `false` at the end.
    fn fill(&mut self) -> io::Result<bool> {
        while self.pos >= self.out.len() {
            if self.malformed {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("malformed {} input", self.encoding.name()),
                ));
            }
            if self.eof {
                return Ok(false);
            }

            let input = self.inner.fill_buf()?;
            let last = input.is_empty();
            let capacity = self
                .decoder
                .max_utf8_buffer_length_without_replacement(input.len())
                .ok_or_else(|| io::Error::other("decoded text exceeds addressable size"))?;

            self.out.clear();
            self.out.resize(capacity, 0);
            let (result, read, written) =
                self.decoder.decode_to_utf8_without_replacement(input, &mut self.out, last);

            self.out.truncate(written);
            self.pos = 0;
            self.inner.consume(read);
            match result {
                DecoderResult::InputEmpty => self.eof = last,
                DecoderResult::Malformed(..) => self.malformed = true,
                DecoderResult::OutputFull => {}
            }
        }
        Ok(true)
    }
}

impl<R: BufRead> Read for TextDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() || !self.fill()? {
            return Ok(0);
        }

        let n = (self.out.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.out[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
