use std::io::{Stderr, Write};

use crate::decoder::Utf8Decoder;
use crate::err::{Error, ErrorKind};
use crate::opt::{Options, Volume};
use crate::source::{DoggedSource, Source, VerboseSource};
use crate::util::nicely_units;

/// The byte source wrapped according to the volume.
enum Wrapped<S, W> {
    Dogged(DoggedSource<S>),
    Verbose(VerboseSource<S, W>),
}

impl<S, W> Wrapped<S, W> {
    fn into_inner(self) -> S {
        match self {
            Self::Dogged(source) => source.into_inner(),
            Self::Verbose(source) => source.into_parts().0,
        }
    }
}

impl<S: Source, W: Write> Source for Wrapped<S, W> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match *self {
            Self::Dogged(ref mut source) => source.read(buf),
            Self::Verbose(ref mut source) => source.read(buf),
        }
    }

    fn available(&mut self) -> std::io::Result<usize> {
        match *self {
            Self::Dogged(ref mut source) => source.available(),
            Self::Verbose(ref mut source) => source.available(),
        }
    }

    fn close(&mut self) -> std::io::Result<()> {
        match *self {
            Self::Dogged(ref mut source) => source.close(),
            Self::Verbose(ref mut source) => source.close(),
        }
    }
}

/// A reader turning a byte source into UTF-16 code units.
///
/// This struct reads raw bytes from its [`Source`] into an internal byte
/// buffer and immediately decodes them into the caller's buffer with a
/// [`Utf8Decoder`]. It never holds on to bytes between reads. The only state
/// carried from one read to the next is the decoder's incomplete sequence and,
/// when the caller's buffer had room for just one code unit, the low half of a
/// surrogate pair.
///
/// The number of bytes requested from the source is bounded by the caller's
/// buffer, so that the decoded code units always fit. Consequently, reading
/// into a small buffer also reads small chunks from the source.
///
/// Interrupted reads are retried. At [`Volume::Regular`] and above, the source
/// is wrapped in a [`VerboseSource`] that logs every read to the reader's log,
/// which is standard error unless created with [`Utf8Reader::with_log`].
///
///
/// # End of Stream
///
/// A read returns zero code units only at the end of the stream, never merely
/// because the bytes read so far end in the middle of a sequence. If the
/// stream ends in the middle of a sequence, the final read produces one
/// replacement character, unless [`Options::replace_truncated`] is disabled.
///
///
/// # Closing
///
/// [`Utf8Reader::close`] closes and drops the source. Afterwards, all read
/// operations fail with [`ErrorKind::Closed`].
pub struct Utf8Reader<S, W = Stderr> {
    /// The wrapped byte source, which is `None` after closing.
    source: Option<Wrapped<S, W>>,
    /// The decoder.
    decoder: Utf8Decoder,
    /// The transient buffer for bytes read from the source.
    bytes: Vec<u8>,
    /// The low surrogate that did not fit into the caller's buffer.
    held: Option<u16>,
    /// The volume of diagnostic output.
    volume: Volume,
    /// The flag for producing a replacement character for a truncated sequence.
    replace_truncated: bool,
}

impl<S: Source> Utf8Reader<S> {
    /// Create a new reader with the default options.
    pub fn new(source: S) -> Self {
        Self::with_options(&Options::default(), source)
    }

    /// Create a new reader with the given options, logging to standard error.
    pub fn with_options(options: &Options, source: S) -> Self {
        Self::with_log(options, source, std::io::stderr())
    }
}

impl<S: Source, W: Write> Utf8Reader<S, W> {
    /// Create a new reader with the given options and log.
    ///
    /// The log is only written at [`Volume::Regular`] and above.
    pub fn with_log(options: &Options, source: S, log: W) -> Self {
        let volume = options.volume();
        let source = if Volume::Regular <= volume {
            Wrapped::Verbose(VerboseSource::with_log(source, log))
        } else {
            Wrapped::Dogged(DoggedSource::new(source))
        };

        Self {
            source: Some(source),
            decoder: Utf8Decoder::new(),
            bytes: vec![0; options.read_buffer_size()],
            held: None,
            volume,
            replace_truncated: options.replace_truncated(),
        }
    }

    /// Determine whether this reader has been closed.
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Unwrap the byte source, unless this reader has been closed.
    ///
    /// Any incomplete sequence and held back code unit are lost.
    pub fn into_inner(self) -> Option<S> {
        self.source.map(Wrapped::into_inner)
    }

    // ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~
    // Diagnostics

    fn log_detail(&mut self, args: std::fmt::Arguments<'_>) {
        if Volume::Detailed <= self.volume {
            if let Some(Wrapped::Verbose(ref mut source)) = self.source {
                let _ = writeln!(source.log_mut(), "{}", args);
            }
        }
    }

    // ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~
    // Reading bytes

    /// Fill the first `limit` bytes of the byte buffer and return the number
    /// of bytes read. A zero count signals the end of the stream.
    fn fill(&mut self, limit: usize) -> Result<usize, Error> {
        let source = self.source.as_mut().ok_or(ErrorKind::Closed)?;
        let count = source.read(&mut self.bytes[..limit])?;
        assert!(count <= limit, "read count is at most buffer size");
        Ok(count)
    }

    /// Handle the end of the stream.
    fn finish(&mut self, buf: &mut [u16]) -> usize {
        let pending = self.decoder.is_pending();
        let count = if self.replace_truncated {
            self.decoder.finish(buf)
        } else {
            self.decoder.reset();
            0
        };

        self.log_detail(format_args!(
            "eos:   {} truncated sequence, {} units",
            if pending { "with" } else { "without" },
            count
        ));
        count
    }

    // ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~ ~
    // Reading code units

    /// Read UTF-16 code units into the buffer and return their number.
    ///
    /// This method returns zero only for an empty buffer or at the end of the
    /// stream.
    ///
    /// # Errors
    ///
    /// This method fails with [`ErrorKind::Closed`] if this reader has been
    /// closed and with [`ErrorKind::Unreadable`] if the source fails.
    pub fn read(&mut self, buf: &mut [u16]) -> Result<usize, Error> {
        if self.is_closed() {
            return Err(ErrorKind::Closed.into());
        } else if buf.is_empty() {
            return Ok(0);
        } else if let Some(unit) = self.held.take() {
            buf[0] = unit;
            return Ok(1);
        }

        loop {
            // A pending sequence may complete as a surrogate pair, which takes
            // one more code unit than the bytes completing it.
            let room = buf.len() - self.decoder.max_decoded_len(0);
            if room == 0 {
                let count = self.read_one_byte(buf)?;
                if 0 < count || !self.decoder.is_pending() {
                    return Ok(count);
                }
                continue;
            }

            let limit = room.min(self.bytes.len());
            let count = self.fill(limit)?;
            if count == 0 {
                return Ok(self.finish(buf));
            }

            let written = self.decoder.decode(&self.bytes[..count], buf);
            self.log_detail(format_args!(
                "decode: {:4} bytes -> {:4} units{}, {}",
                count,
                written,
                if self.decoder.is_pending() {
                    ", pending"
                } else {
                    ""
                },
                nicely_units(&buf[..written])
            ));

            if 0 < written {
                return Ok(written);
            }
        }
    }

    /// Read and decode a single byte into a buffer with room for only one
    /// code unit, while a sequence is pending.
    fn read_one_byte(&mut self, buf: &mut [u16]) -> Result<usize, Error> {
        let count = self.fill(1)?;
        if count == 0 {
            return Ok(self.finish(buf));
        }

        let mut scratch = [0; 2];
        let written = self.decoder.decode(&self.bytes[..1], &mut scratch);
        if 0 < written {
            buf[0] = scratch[0];
        }
        if 1 < written {
            self.held = Some(scratch[1]);
        }

        self.log_detail(format_args!(
            "decode:    1 bytes -> {:4} units{}",
            written,
            if self.held.is_some() { ", held" } else { "" }
        ));
        Ok(written.min(1))
    }

    /// Read a single UTF-16 code unit.
    ///
    /// This method returns `None` at the end of the stream.
    ///
    /// # Errors
    ///
    /// See [`Utf8Reader::read`].
    pub fn read_unit(&mut self) -> Result<Option<u16>, Error> {
        let mut unit = [0; 1];
        if self.read(&mut unit)? == 0 {
            Ok(None)
        } else {
            Ok(Some(unit[0]))
        }
    }

    /// Read all code units until the end of the stream, append them to the
    /// vector, and return their number.
    ///
    /// # Errors
    ///
    /// See [`Utf8Reader::read`]. Upon error, the vector retains all code
    /// units read before the failing read.
    pub fn read_to_end(&mut self, out: &mut Vec<u16>) -> Result<usize, Error> {
        let start = out.len();
        let chunk = self.bytes.len();

        loop {
            let len = out.len();
            out.resize(len + chunk, 0);
            match self.read(&mut out[len..]) {
                Ok(0) => {
                    out.truncate(len);
                    return Ok(len - start);
                }
                Ok(n) => out.truncate(len + n),
                Err(err) => {
                    out.truncate(len);
                    return Err(err);
                }
            }
        }
    }

    /// Read all characters until the end of the stream, append them to the
    /// string, and return the number of bytes appended.
    ///
    /// # Errors
    ///
    /// See [`Utf8Reader::read`]. Upon error, the string is left unchanged.
    pub fn read_to_string(&mut self, out: &mut String) -> Result<usize, Error> {
        let mut units = Vec::new();
        self.read_to_end(&mut units)?;

        let start = out.len();
        out.extend(
            char::decode_utf16(units).map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER)),
        );
        Ok(out.len() - start)
    }

    /// Determine whether a read can make progress without blocking.
    ///
    /// This method returns `true` if a code unit is held back or the source
    /// reports available bytes. It returns `false` if the source reports no
    /// bytes or fails to determine their number.
    ///
    /// # Errors
    ///
    /// This method fails with [`ErrorKind::Closed`] if this reader has been
    /// closed.
    pub fn ready(&mut self) -> Result<bool, Error> {
        let source = self.source.as_mut().ok_or(ErrorKind::Closed)?;
        if self.held.is_some() {
            return Ok(true);
        }
        Ok(source.available().is_ok_and(|n| 0 < n))
    }

    /// Close this reader and its source.
    ///
    /// Closing an already closed reader has no effect.
    ///
    /// # Errors
    ///
    /// This method fails with [`ErrorKind::Unreadable`] if closing the source
    /// fails. The reader is closed nonetheless.
    pub fn close(&mut self) -> Result<(), Error> {
        if let Some(mut source) = self.source.take() {
            self.decoder.reset();
            self.held = None;
            source.close()?;
        }
        Ok(())
    }
}

impl<S, W> std::fmt::Debug for Utf8Reader<S, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Utf8Reader")
            .field("is_closed", &self.source.is_none())
            .field("decoder", &self.decoder)
            .field("capacity", &self.bytes.len())
            .field("held", &self.held)
            .field("volume", &self.volume)
            .field("replace_truncated", &self.replace_truncated)
            .finish_non_exhaustive()
    }
}

// ================================================================================================

#[cfg(test)]
mod test {
    use super::{ErrorKind, Utf8Reader};
    use crate::opt::Options;
    use crate::source::test::Script;
    use crate::source::Source;
    use crate::utf16::REPLACEMENT;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::io::Write;

    const TEXT: &str = "A€😀 · Ελληνικά · 日本語 · 🌸𝄞 · plain ASCII for good measure";

    fn utf16(s: &str) -> Vec<u16> {
        s.encode_utf16().collect()
    }

    fn read_all<S: Source, W: Write>(reader: &mut Utf8Reader<S, W>, size: usize) -> Vec<u16> {
        let mut output = Vec::new();
        let mut buf = vec![0; size];
        loop {
            let count = reader.read(&mut buf).expect("reading succeeds");
            if count == 0 {
                return output;
            }
            output.extend_from_slice(&buf[..count]);
        }
    }

    #[test]
    fn test_read() {
        let mut reader = Utf8Reader::new(b"A\xe2\x82\xac\xf0\x9f\x98\x80".as_slice());
        let mut buf = [0; 16];
        assert_eq!(reader.read(&mut buf).expect("reading succeeds"), 4);
        assert_eq!(&buf[..4], &[0x41, 0x20ac, 0xd83d, 0xde00]);
        assert_eq!(reader.read(&mut buf).expect("reading succeeds"), 0);
        assert_eq!(reader.read(&mut []).expect("reading succeeds"), 0);
    }

    #[test]
    fn test_chunked_source() {
        let script = Script::new()
            .bytes(b"A\xe2")
            .bytes(b"\x82")
            .bytes(b"\xac\xf0\x9f\x98")
            .bytes(b"\x80");
        let mut reader = Utf8Reader::new(script);
        assert_eq!(read_all(&mut reader, 16), utf16("A€😀"));
    }

    #[test]
    fn test_no_empty_reads() {
        let script = Script::new().bytes(b"\xe2").bytes(b"\x82").bytes(b"\xac");
        let mut reader = Utf8Reader::new(script);
        let mut buf = [0; 8];
        assert_eq!(reader.read(&mut buf).expect("reading succeeds"), 1);
        assert_eq!(buf[0], 0x20ac);
        assert_eq!(reader.read(&mut buf).expect("reading succeeds"), 0);
    }

    #[test]
    fn test_read_unit() {
        let mut reader = Utf8Reader::new("😀!".as_bytes());
        let mut units = Vec::new();
        while let Some(unit) = reader.read_unit().expect("reading succeeds") {
            units.push(unit);
        }
        assert_eq!(units, vec![0xd83d, 0xde00, 0x21]);

        let mut reader = Utf8Reader::new(TEXT.as_bytes());
        assert_eq!(read_all(&mut reader, 1), utf16(TEXT));
    }

    #[test]
    fn test_buffer_sizes() {
        let bytes = TEXT.as_bytes();
        let expected = utf16(TEXT);

        for size in 1..10 {
            let options = Options::builder().read_buffer_size(size).build();
            for units in 1..10 {
                let mut reader = Utf8Reader::with_options(&options, bytes);
                assert_eq!(read_all(&mut reader, units), expected, "{} {}", size, units);
            }
        }
    }

    #[test]
    fn test_random_reads() {
        let bytes = TEXT.as_bytes();
        let expected = utf16(TEXT);
        let mut rng = StdRng::seed_from_u64(0xf00d);

        for _ in 0..100 {
            let mut script = Script::new();
            let mut start = 0;
            while start < bytes.len() {
                let end = rng.random_range(start + 1..=bytes.len());
                script = script.bytes(&bytes[start..end]);
                start = end;
            }

            let mut reader = Utf8Reader::new(script);
            let mut output = Vec::new();
            loop {
                let mut buf = vec![0; rng.random_range(1..8)];
                let count = reader.read(&mut buf).expect("reading succeeds");
                if count == 0 {
                    break;
                }
                output.extend_from_slice(&buf[..count]);
            }
            assert_eq!(output, expected);
        }
    }

    #[test]
    fn test_truncated() {
        let mut reader = Utf8Reader::new(b"ok\xe2\x82".as_slice());
        assert_eq!(read_all(&mut reader, 8), vec![0x6f, 0x6b, REPLACEMENT]);

        let options = Options::builder().replace_truncated(false).build();
        let mut reader = Utf8Reader::with_options(&options, b"ok\xe2\x82".as_slice());
        assert_eq!(read_all(&mut reader, 8), vec![0x6f, 0x6b]);

        // A one-unit buffer takes the same path.
        let mut reader = Utf8Reader::new(b"\xf0\x9f\x98".as_slice());
        assert_eq!(read_all(&mut reader, 1), vec![REPLACEMENT]);
    }

    #[test]
    fn test_malformed() {
        let mut reader = Utf8Reader::new(b"\xc0A\xe2A!".as_slice());
        assert_eq!(read_all(&mut reader, 8), vec![REPLACEMENT, 0x41, REPLACEMENT, 0x21]);
    }

    #[test]
    fn test_read_to_end() {
        let options = Options::builder().read_buffer_size(5).build();
        let mut reader = Utf8Reader::with_options(&options, TEXT.as_bytes());
        let mut output = vec![0x2a];
        assert_eq!(
            reader.read_to_end(&mut output).expect("reading succeeds"),
            utf16(TEXT).len()
        );
        assert_eq!(output[0], 0x2a);
        assert_eq!(&output[1..], utf16(TEXT).as_slice());

        let mut reader = Utf8Reader::new(TEXT.as_bytes());
        let mut text = String::from(">");
        assert_eq!(
            reader.read_to_string(&mut text).expect("reading succeeds"),
            TEXT.len()
        );
        assert_eq!(&text[1..], TEXT);
    }

    #[test]
    fn test_close() {
        let mut script = Script::new().bytes(b"hello");
        {
            let mut reader = Utf8Reader::new(&mut script);
            assert!(!reader.is_closed());
            assert_eq!(reader.read_unit().expect("reading succeeds"), Some(0x68));
            reader.close().expect("closing succeeds");
            assert!(reader.is_closed());

            let error = reader.read(&mut [0; 4]).expect_err("reader is closed");
            assert_eq!(error.kind(), ErrorKind::Closed);
            let error = reader.ready().expect_err("reader is closed");
            assert_eq!(error.kind(), ErrorKind::Closed);

            reader.close().expect("closing again succeeds");
            assert!(reader.into_inner().is_none());
        }
        assert!(script.closed);
    }

    #[test]
    fn test_unreadable() {
        let script = Script::new()
            .bytes(b"ab")
            .error(std::io::ErrorKind::Interrupted)
            .bytes(b"c")
            .error(std::io::ErrorKind::BrokenPipe)
            .bytes(b"d");
        let mut reader = Utf8Reader::new(script);
        let mut buf = [0; 8];

        assert_eq!(reader.read(&mut buf).expect("reading succeeds"), 2);
        assert_eq!(reader.read(&mut buf).expect("reading succeeds"), 1);
        let error = reader.read(&mut buf).expect_err("source fails");
        assert_eq!(error.kind(), ErrorKind::Unreadable);
        let error: std::io::Error = error.into();
        assert_eq!(error.kind(), std::io::ErrorKind::BrokenPipe);

        // The reader remains usable.
        assert_eq!(reader.read(&mut buf).expect("reading succeeds"), 1);
        assert_eq!(buf[0], 0x64);
    }

    #[test]
    fn test_silent_log() {
        let script = Script::new()
            .bytes(b"A\xe2")
            .error(std::io::ErrorKind::Interrupted)
            .bytes(b"\x82\xac");
        let mut log = Vec::new();
        {
            let mut reader = Utf8Reader::with_log(&Options::default(), script, &mut log);
            assert_eq!(read_all(&mut reader, 8), utf16("A€"));
            reader.close().expect("closing succeeds");
        }
        assert!(log.is_empty());
    }

    #[test]
    fn test_regular_log() {
        let script = Script::new()
            .bytes(b"A\xe2")
            .error(std::io::ErrorKind::Interrupted)
            .bytes(b"\x82\xac");
        let mut log = Vec::new();
        {
            let mut reader = Utf8Reader::with_log(&Options::with_log(), script, &mut log);
            assert_eq!(read_all(&mut reader, 8), utf16("A€"));
            reader.close().expect("closing succeeds");
        }

        let log = String::from_utf8(log).expect("log is valid UTF-8");
        assert_eq!(
            log,
            "read:    2 bytes, 0 interrupts, \"A‹e2›\"\n\
             read:    2 bytes, 1 interrupts, \"‹82›‹ac›\"\n\
             read:    0 bytes, 0 interrupts, \"\"\n\
             close\n"
        );
    }

    #[test]
    fn test_detailed_log() {
        let script = Script::new().bytes(b"A\xe2").bytes(b"\x82");
        let mut log = Vec::new();
        {
            let options = Options::with_detailed_log();
            let mut reader = Utf8Reader::with_log(&options, script, &mut log);
            assert_eq!(read_all(&mut reader, 8), vec![0x41, REPLACEMENT]);
        }

        let log = String::from_utf8(log).expect("log is valid UTF-8");
        assert_eq!(
            log,
            "read:    2 bytes, 0 interrupts, \"A‹e2›\"\n\
             decode:    2 bytes ->    1 units, pending, \"A\"\n\
             read:    1 bytes, 0 interrupts, \"‹82›\"\n\
             decode:    1 bytes ->    0 units, pending, \"\"\n\
             read:    0 bytes, 0 interrupts, \"\"\n\
             eos:   with truncated sequence, 1 units\n\
             read:    0 bytes, 0 interrupts, \"\"\n\
             eos:   without truncated sequence, 0 units\n"
        );

        // A one-unit buffer holds back the low surrogate.
        let mut log = Vec::new();
        {
            let options = Options::with_detailed_log();
            let mut reader = Utf8Reader::with_log(&options, "😀".as_bytes(), &mut log);
            assert_eq!(reader.read_unit().expect("reading succeeds"), Some(0xd83d));
        }

        let log = String::from_utf8(log).expect("log is valid UTF-8");
        assert_eq!(
            log,
            "read:    1 bytes, 0 interrupts, \"‹f0›\"\n\
             decode:    1 bytes ->    0 units, pending, \"\"\n\
             read:    1 bytes, 0 interrupts, \"‹9f›\"\n\
             decode:    1 bytes ->    0 units\n\
             read:    1 bytes, 0 interrupts, \"‹98›\"\n\
             decode:    1 bytes ->    0 units\n\
             read:    1 bytes, 0 interrupts, \"‹80›\"\n\
             decode:    1 bytes ->    2 units, held\n"
        );
    }

    #[test]
    fn test_ready() {
        let mut reader = Utf8Reader::new(b"hi".as_slice());
        assert!(reader.ready().expect("reader is open"));
        assert_eq!(read_all(&mut reader, 4), utf16("hi"));
        assert!(!reader.ready().expect("reader is open"));

        // Sources that fail to report availability are not ready.
        let script = Script::new().error(std::io::ErrorKind::Other);
        let mut reader = Utf8Reader::new(script);
        assert!(!reader.ready().expect("reader is open"));

        // A held back low surrogate is ready.
        let mut reader = Utf8Reader::new(crate::source::Unbuffered::new("😀".as_bytes()));
        assert!(!reader.ready().expect("reader is open"));
        assert_eq!(reader.read_unit().expect("reading succeeds"), Some(0xd83d));
        assert!(reader.ready().expect("reader is open"));
        assert_eq!(reader.read_unit().expect("reading succeeds"), Some(0xde00));
        assert_eq!(reader.read_unit().expect("reading succeeds"), None);
    }
}
