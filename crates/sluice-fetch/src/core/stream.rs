use std::io::{self, Read};

use bytes::{Buf, Bytes};

/// Exposes an iterator of byte chunks as a blocking [`Read`] stream.
///
/// Each `read` fills the caller's buffer completely unless the underlying
/// iterator runs out, in which case it returns however many bytes were copied
/// (zero once fully drained). At most one partially consumed chunk is held
/// between reads, and chunks are pulled only when the buffer still has room.
///
/// An error from the iterator is returned by the `read` that pulls it. If
/// that `read` had already copied bytes, it returns the count instead and the
/// error is returned by the following call.
pub struct IterStream<I> {
    iter:     I,
    leftover: Bytes,
    pending:  Option<io::Error>,
    done:     bool,
}

impl<I> IterStream<I> {
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            leftover: Bytes::new(),
            pending: None,
            done: false,
        }
    }

    /// Bytes held back from the last read.
    pub fn leftover(&self) -> &[u8] { &self.leftover }

    /// Give back the iterator. A held leftover is dropped.
    pub fn into_inner(self) -> I { self.iter }
}

impl<I, B, E> Read for IterStream<I>
where
    I: Iterator<Item = Result<B, E>>,
    B: Into<Bytes>,
    E: Into<io::Error>,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }

        let mut pos = 0;
        while pos < buf.len() {
            if self.leftover.is_empty() {
                if self.done {
                    break;
                }
                match self.iter.next() {
                    Some(Ok(chunk)) => self.leftover = chunk.into(),
                    Some(Err(err)) => {
                        let err = err.into();
                        if pos == 0 {
                            return Err(err);
                        }
                        self.pending = Some(err);
                        break;
                    }
                    None => {
                        self.done = true;
                        break;
                    }
                }
                continue;
            }

            let n = self.leftover.len().min(buf.len() - pos);
            buf[pos..pos + n].copy_from_slice(&self.leftover[..n]);
            self.leftover.advance(n);
            pos += n;
        }

        Ok(pos)
    }
}
