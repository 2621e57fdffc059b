//! Helper module with utilities for displaying bytes and code units.
//!
//! Diagnostics show raw input as well as decoded output. Both may contain
//! control characters, malformed sequences, and lone surrogates, none of which
//! should reach a terminal unescaped.

use std::fmt;
use std::io::Write;

/// Nicely format a byte.
fn format_nicely<W>(byte: u8, output: &mut W) -> Result<usize, fmt::Error>
where
    W: fmt::Write + ?Sized,
{
    if (0x20..=0x7e).contains(&byte) {
        output.write_char(byte as char)?;
        return Ok(1);
    }

    let replacement = match byte {
        // Letters are math sans-serif Unicode letters, so that mnemonics are
        // distinct from hexadecimal numbers. In UTF-8, ‹› are 3 bytes each and
        // the math letters are 4 bytes each.
        0x00 => "‹𝗇𝗎𝗅›",
        0x07 => "‹𝖻𝖾𝗅›",
        0x09 => "‹𝗁𝗍›",
        0x0a => "‹𝗅𝖿›",
        0x0d => "‹𝖼𝗋›",
        0x1b => "‹𝖾𝗌𝖼›",
        0x7f => "‹𝖽𝖾𝗅›",
        _ => "",
    };
    if !replacement.is_empty() {
        output.write_str(replacement)?;
        return Ok(2 + (replacement.len() - 6) / 4);
    }

    output.write_fmt(format_args!("‹{:02x}›", byte))?;
    Ok(4)
}

/// Write bytes nicely.
///
/// Conveniently, this trait's two methods have default implementations, and the
/// trait has a default implementation for all writers.
///
/// # Example
///
/// ```
/// use prettyutf::util::WriteNicely;
/// let mut buffer = [0; 20];
/// let mut cursor = buffer.as_mut_slice();
/// let mut size = 0;
///
/// size += cursor.write_slice_nicely(b"yo")?;
/// size += cursor.write_nicely(0xe2)?;
/// assert_eq!(size, 6);
///
/// let len = cursor.len();
/// let len = buffer.len() - len;
/// assert_eq!(&buffer[..len], "yo‹e2›".as_bytes());
/// # Ok::<(), std::io::Error>(())
/// ```
pub trait WriteNicely: Write {
    /// Output a nicely formatted byte with the writer.
    ///
    /// This method formats printable ASCII characters as themselves, common
    /// controls as two- or three-letter mnemonics such as `‹𝗅𝖿›`, and all other
    /// bytes, including all bytes of multi-byte UTF-8 sequences, as two-digit
    /// hexadecimal numbers such as `‹e2›`.
    fn write_nicely(&mut self, byte: u8) -> std::io::Result<usize> {
        struct Adapter<'a, T: ?Sized + 'a> {
            inner: &'a mut T,
            error: std::io::Result<usize>,
        }

        impl<T: std::io::Write + ?Sized> fmt::Write for Adapter<'_, T> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.inner.write_all(s.as_bytes()).map_err(|e| {
                    self.error = Err(e);
                    fmt::Error
                })
            }
        }

        let mut output = Adapter {
            inner: self,
            error: Ok(0),
        };

        format_nicely(byte, &mut output).map_err(|_| match output.error {
            Ok(_) => std::io::Error::other("formatting failed without underlying error"),
            Err(err) => err,
        })
    }

    /// Write the slice of bytes nicely.
    fn write_slice_nicely(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
        let mut size = 0;
        for byte in bytes.iter() {
            size += self.write_nicely(*byte)?;
        }
        Ok(size)
    }
}

impl<W: Write> WriteNicely for W {}

// -----------------------------------------------------------------------------------------------

/// A newtype for nicely formatting a byte slice.
struct ByteStringNicely<'a>(&'a [u8]);

impl fmt::Display for ByteStringNicely<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for byte in self.0.iter() {
            if *byte == b'"' {
                f.write_str("\\\"")?;
            } else {
                format_nicely(*byte, f)?;
            }
        }
        f.write_str("\"")
    }
}

impl fmt::Debug for ByteStringNicely<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Turn the slice into a value that displays nicely.
pub fn nicely_str(bytes: &[u8]) -> impl fmt::Debug + fmt::Display + use<'_> {
    ByteStringNicely(bytes)
}

// -----------------------------------------------------------------------------------------------

/// A newtype for nicely formatting UTF-16 code units.
struct UnitsNicely<'a>(&'a [u16]);

impl fmt::Display for UnitsNicely<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for result in char::decode_utf16(self.0.iter().copied()) {
            match result {
                Ok('"') => f.write_str("\\\"")?,
                Ok(c) if c.is_ascii() => {
                    format_nicely(c as u8, f)?;
                }
                Ok(c) if c.is_control() || c == char::REPLACEMENT_CHARACTER => {
                    write!(f, "‹U+{:04X}›", c as u32)?;
                }
                Ok(c) => fmt::Write::write_char(f, c)?,
                Err(err) => write!(f, "‹U+{:04X}›", err.unpaired_surrogate())?,
            }
        }
        f.write_str("\"")
    }
}

impl fmt::Debug for UnitsNicely<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Turn the code units into a value that displays nicely.
///
/// Printable characters display as themselves, surrogate pairs display as the
/// character they encode, and control characters, replacement characters, as
/// well as lone surrogates display as their code points, e.g., `‹U+FFFD›`.
pub fn nicely_units(units: &[u16]) -> impl fmt::Debug + fmt::Display + use<'_> {
    UnitsNicely(units)
}

// ================================================================================================
