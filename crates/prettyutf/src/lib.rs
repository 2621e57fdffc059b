//! # Pretty 🌸 Utf
//!
//! \[  [**Docs.rs**](https://docs.rs/prettyutf/latest/prettyutf/)
//! | [**Rust Crate**](https://crates.io/crates/prettyutf)
//! | [**Repository**](https://github.com/apparebit/prettypretty)
//! \]
//!
//! This crate provides **incremental and allocation-free decoding of UTF-8
//! into UTF-16 code units**. It has no dependencies.
//!
//! At its core is [`Utf8Decoder`], which implements Björn Höhrmann's
//! [table-driven automaton](https://bjoern.hoehrmann.de/utf-8/decoder/dfa/)
//! for recognizing UTF-8. The decoder:
//!
//!   * processes arbitrarily chunked input, carrying incomplete sequences from
//!     one chunk to the next, so that the result does not depend on chunking;
//!   * writes directly into the caller's buffer without allocating;
//!   * never fails, replacing malformed sequences with U+FFFD instead;
//!   * turns supplementary code points into surrogate pairs.
//!
//! [`Utf8Reader`] builds on the decoder to read UTF-16 code units from a byte
//! [`Source`], which generalizes [`Read`](std::io::Read) with the ability to
//! report available bytes and to close the source. The reader also handles
//! end-of-stream, closing, and I/O errors.
//!
//! The [`opt`] module provides the reader's options, the [`err`] module its
//! error type, and the [`util`] module helpers for displaying raw bytes and
//! code units.
//!
//!
//! # Example
//!
//! Decoding with [`Utf8Decoder`] works one chunk at a time:
//!
//! ```
//! # use prettyutf::Utf8Decoder;
//! let input = "A€😀".as_bytes();
//! let mut output = [0; 8];
//! let mut decoder = Utf8Decoder::new();
//!
//! let mut count = 0;
//! for chunk in input.chunks(3) {
//!     count += decoder.decode(chunk, &mut output[count..]);
//! }
//! count += decoder.finish(&mut output[count..]);
//!
//! assert_eq!(&output[..count], &[0x41, 0x20ac, 0xd83d, 0xde00]);
//! ```
//!
//! Reading from a byte source with [`Utf8Reader`] is just as easy:
//!
//! ```
//! # use prettyutf::Utf8Reader;
//! let mut reader = Utf8Reader::new(b"\xc0A\xf0\x9f\x8c\xb8".as_slice());
//! let mut text = String::new();
//! reader.read_to_string(&mut text)?;
//! assert_eq!(text, "\u{fffd}A🌸");
//! # Ok::<(), prettyutf::err::Error>(())
//! ```

mod decoder;
mod dfa;
pub mod err;
pub mod opt;
mod reader;
pub mod source;
pub mod utf16;
pub mod util;

pub use decoder::{decode, Utf8Decoder};
pub use reader::Utf8Reader;
pub use source::Source;
pub use utf16::REPLACEMENT;
