//! Helper module with byte sources.
//!
//! A [`Source`] is a reader that can also report how many bytes are available
//! without blocking and that can be closed explicitly. This module implements
//! the trait for in-memory byte sequences and buffered readers, and it
//! provides [`Unbuffered`] for any other reader. It also provides two
//! wrappers: [`DoggedSource`] transparently retries interrupted reads and
//! [`VerboseSource`] logs every read.

use std::io::{BufReader, Cursor, Empty, ErrorKind, Read, Result, Write};

use crate::util::WriteNicely;

/// A source of raw bytes.
pub trait Source {
    /// Read bytes into the buffer and return their number.
    ///
    /// As for [`Read::read`], a zero count for a non-empty buffer signals the
    /// end of the byte stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Determine the number of bytes that can be read without blocking.
    ///
    /// The default implementation returns zero, i.e., unknown.
    fn available(&mut self) -> Result<usize> {
        Ok(0)
    }

    /// Close this source.
    ///
    /// The default implementation does nothing.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A mutably borrowed source is a source.
impl<S: Source + ?Sized> Source for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn available(&mut self) -> Result<usize> {
        (**self).available()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// A boxed source is a source.
impl<S: Source + ?Sized> Source for Box<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn available(&mut self) -> Result<usize> {
        (**self).available()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

impl Source for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Read::read(self, buf)
    }

    fn available(&mut self) -> Result<usize> {
        Ok(self.len())
    }
}

impl<T: AsRef<[u8]>> Source for Cursor<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Read::read(self, buf)
    }

    fn available(&mut self) -> Result<usize> {
        let len = self.get_ref().as_ref().len() as u64;
        Ok(len.saturating_sub(self.position()) as usize)
    }
}

impl<R: Read> Source for BufReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        Read::read(self, buf)
    }

    fn available(&mut self) -> Result<usize> {
        Ok(self.buffer().len())
    }
}

impl Source for Empty {
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize> {
        Ok(0)
    }
}

// ------------------------------------------------------------------------------------------------

/// A source for an arbitrary reader.
///
/// Since readers cannot report how many bytes they hold, this source always
/// reports zero available bytes.
#[derive(Debug)]
pub struct Unbuffered<R> {
    inner: R,
}

impl<R> Unbuffered<R> {
    /// Create a new unbuffered source.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwrap the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Source for Unbuffered<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.inner.read(buf)
    }
}

// ------------------------------------------------------------------------------------------------

/// A source that tolerates interruptions.
#[derive(Debug)]
pub struct DoggedSource<S> {
    inner: S,
}

impl<S> DoggedSource<S> {
    /// Create a new dogged source.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Unwrap the underlying source.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Source> Source for DoggedSource<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn available(&mut self) -> Result<usize> {
        self.inner.available()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}

// ------------------------------------------------------------------------------------------------

/// Write one line describing a read to the log.
fn log_read<W: Write>(log: &mut W, bytes: &[u8], interrupts: usize) -> Result<()> {
    write!(
        log,
        "read: {:4} bytes, {} interrupts, \"",
        bytes.len(),
        interrupts
    )?;
    log.write_slice_nicely(bytes)?;
    log.write_all(b"\"\n")
}

/// A source that logs helpful information for debugging.
///
/// For every read, this source writes one line to its log, which is standard
/// error by default. The line includes the number of bytes read, the number
/// of interrupted attempts, and the bytes themselves, formatted with
/// [`WriteNicely`]. Like [`DoggedSource`], it retries interrupted reads.
/// Failures writing the log are ignored.
#[derive(Debug)]
pub struct VerboseSource<S, W = std::io::Stderr> {
    inner: S,
    log: W,
}

impl<S> VerboseSource<S> {
    /// Create a new verbose source logging to standard error.
    pub fn new(inner: S) -> Self {
        Self::with_log(inner, std::io::stderr())
    }
}

impl<S, W> VerboseSource<S, W> {
    /// Create a new verbose source logging to the given writer.
    pub fn with_log(inner: S, log: W) -> Self {
        Self { inner, log }
    }

    /// Get a mutable reference to the log.
    pub fn log_mut(&mut self) -> &mut W {
        &mut self.log
    }

    /// Unwrap the underlying source and log.
    pub fn into_parts(self) -> (S, W) {
        (self.inner, self.log)
    }
}

impl<S: Source, W: Write> Source for VerboseSource<S, W> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut interrupts = 0;

        loop {
            match self.inner.read(buf) {
                Ok(n) => {
                    let _ = log_read(&mut self.log, &buf[..n], interrupts);
                    return Ok(n);
                }
                Err(ref e) if e.kind() == ErrorKind::Interrupted => {
                    interrupts += 1;
                }
                Err(e) => {
                    let _ = writeln!(self.log, "read: {:?}, {} interrupts", &e, interrupts);
                    return Err(e);
                }
            }
        }
    }

    fn available(&mut self) -> Result<usize> {
        self.inner.available()
    }

    fn close(&mut self) -> Result<()> {
        let _ = writeln!(self.log, "close");
        self.inner.close()
    }
}

// ================================================================================================
