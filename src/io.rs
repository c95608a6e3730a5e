//! I/O wrappers that count bytes into a [`ProgressBar`].
//!
//! [`ProgressReader`] and [`ProgressWriter`] wrap any [`Read`] or [`Write`] and pass data
//! through untouched, adding every byte that actually moved to the bar's counter. Typical
//! uses are downloads, uploads, hashing and (de)compressing streams.
//!
//! A [`ProgressBar`] is itself a [`Write`] that discards its input and only counts it,
//! which makes `io::copy(&mut reader, &mut bar)` a byte meter.
//!
//! The overhead is a single atomic addition per `read` or `write` call.

use std::io::{self, Read, Write};

use crate::ProgressBar;

/// A wrapper around [`Read`] that adds the bytes read to a [`ProgressBar`].
pub struct ProgressReader<R> {
    inner: R,
    bar: ProgressBar,
}

impl<R> ProgressReader<R> {
    /// Wraps `inner`, counting into `bar`.
    pub const fn new(inner: R, bar: ProgressBar) -> Self {
        Self { inner, bar }
    }

    /// Unwraps the reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bar.add(byte_count(n));
        Ok(n)
    }
}

/// A wrapper around [`Write`] that adds the bytes written to a [`ProgressBar`].
pub struct ProgressWriter<W> {
    inner: W,
    bar: ProgressBar,
}

impl<W> ProgressWriter<W> {
    /// Wraps `inner`, counting into `bar`.
    pub const fn new(inner: W, bar: ProgressBar) -> Self {
        Self { inner, bar }
    }

    /// Unwraps the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for ProgressWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bar.add(byte_count(n));
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl ProgressBar {
    /// Wraps `reader` so that bytes read through it advance this bar.
    pub fn wrap_read<R: Read>(&self, reader: R) -> ProgressReader<R> {
        ProgressReader::new(reader, self.clone())
    }

    /// Wraps `writer` so that bytes written through it advance this bar.
    pub fn wrap_write<W: Write>(&self, writer: W) -> ProgressWriter<W> {
        ProgressWriter::new(writer, self.clone())
    }
}

impl Write for ProgressBar {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.add(byte_count(buf.len()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn byte_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
