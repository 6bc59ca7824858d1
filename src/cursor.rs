//! Buffered, bounds-checked reader over a seekable stream
//!
//! A [`ByteCursor`] owns one handle on the capture data and a circular buffer, and tracks its
//! own absolute position. Two cursors over two handles of the same file never share state, so
//! a sequential cursor and a random-access cursor can be used in any order.

use crate::error::TraceError;
use circular::Buffer;
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// Default capacity of the cursor buffer
pub const DEFAULT_CAPACITY: usize = 65536;

/// Buffered reader with exact-length reads and absolute offsets
///
/// All reads either return exactly the requested number of bytes, or fail. When the stream
/// ends before the request is satisfied, nothing is consumed and
/// [`TraceError::UnexpectedEof`] is returned.
///
/// The buffer grows if a single read is bigger than its capacity.
pub struct ByteCursor<R>
where
    R: Read + Seek,
{
    reader: R,
    buffer: Buffer,
    // absolute offset of the first byte of `buffer.data()`
    offset: u64,
    reader_exhausted: bool,
}

impl<R> ByteCursor<R>
where
    R: Read + Seek,
{
    /// Creates a new `ByteCursor<R>` starting at the current position of `reader`
    pub fn new(capacity: usize, mut reader: R) -> Result<ByteCursor<R>, TraceError> {
        let offset = reader.stream_position()?;
        Ok(ByteCursor {
            reader,
            buffer: Buffer::with_capacity(capacity),
            offset,
            reader_exhausted: false,
        })
    }

    /// Absolute offset of the next byte to be read
    #[inline]
    pub fn tell(&self) -> u64 {
        self.offset
    }

    /// Move the cursor to an absolute offset
    ///
    /// Seeking forward inside the buffered data does not touch the underlying reader.
    pub fn seek(&mut self, offset: u64) -> Result<(), TraceError> {
        if offset >= self.offset {
            let delta = offset - self.offset;
            if delta <= self.buffer.available_data() as u64 {
                self.consume(delta as usize);
                return Ok(());
            }
        }
        self.reader.seek(SeekFrom::Start(offset))?;
        let pending = self.buffer.available_data();
        self.buffer.consume(pending);
        self.buffer.shift();
        self.offset = offset;
        self.reader_exhausted = false;
        Ok(())
    }

    /// Fill `buf` entirely, or fail without consuming anything
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), TraceError> {
        let available = self.fill_to(buf.len())?;
        if available < buf.len() {
            return Err(self.short_read(buf.len(), available));
        }
        buf.copy_from_slice(&self.buffer.data()[..buf.len()]);
        self.consume(buf.len());
        Ok(())
    }

    /// Fill `buf` entirely, distinguishing a clean end of stream
    ///
    /// Returns `Ok(false)` if no byte at all is left, and [`TraceError::UnexpectedEof`] if
    /// only part of `buf` could be read.
    pub fn read_exact_or_eof(&mut self, buf: &mut [u8]) -> Result<bool, TraceError> {
        let available = self.fill_to(buf.len())?;
        if available == 0 && !buf.is_empty() {
            return Ok(false);
        }
        if available < buf.len() {
            return Err(self.short_read(buf.len(), available));
        }
        buf.copy_from_slice(&self.buffer.data()[..buf.len()]);
        self.consume(buf.len());
        Ok(true)
    }

    /// Read exactly `len` bytes into a new vector
    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, TraceError> {
        let mut v = vec![0; len];
        self.read_exact(&mut v)?;
        Ok(v)
    }

    /// Discard exactly `len` bytes
    pub fn skip(&mut self, len: usize) -> Result<(), TraceError> {
        let available = self.fill_to(len)?;
        if available < len {
            return Err(self.short_read(len, available));
        }
        self.consume(len);
        Ok(())
    }

    /// Returns true if the underlying reader returned end of stream on the last refill
    ///
    /// Note that there can still be buffered data.
    #[inline]
    pub fn reader_exhausted(&self) -> bool {
        self.reader_exhausted
    }

    #[inline]
    fn consume(&mut self, len: usize) {
        self.buffer.consume(len);
        self.offset += len as u64;
    }

    fn short_read(&self, needed: usize, available: usize) -> TraceError {
        TraceError::UnexpectedEof {
            offset: self.offset,
            needed,
            available,
        }
    }

    // Try to have at least `len` bytes buffered. Returns the number of usable bytes, which is
    // less than `len` only if the reader is exhausted.
    fn fill_to(&mut self, len: usize) -> Result<usize, TraceError> {
        while self.buffer.available_data() < len && !self.reader_exhausted {
            if self.buffer.capacity() < len {
                self.buffer.grow(len);
            }
            self.refill()?;
        }
        Ok(self.buffer.available_data().min(len))
    }

    fn refill(&mut self) -> Result<(), TraceError> {
        self.buffer.shift();
        let space = self.buffer.space();
        // check if available space is empty, so we can distinguish
        // a read() returning 0 because of EOF or because we requested 0
        if space.is_empty() {
            return Ok(());
        }
        let sz = loop {
            match self.reader.read(space) {
                Ok(sz) => break sz,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(TraceError::Io(e)),
            }
        };
        self.reader_exhausted = sz == 0;
        self.buffer.fill(sz);
        Ok(())
    }
}
