use crate::dfa::{step, UTF8_ACCEPT, UTF8_REJECT};
use crate::utf16::{write_code_point, REPLACEMENT};

/// An incremental UTF-8 decoder producing UTF-16 code units.
///
/// A decoder consumes one logical byte stream in arbitrarily sized chunks.
/// Each invocation of [`Utf8Decoder::decode`] processes every byte of its
/// chunk exactly once and carries any incomplete sequence over to the next
/// invocation, so that the concatenated output does not depend on where the
/// stream was split. The decoder neither allocates nor buffers; it writes
/// directly into the caller's output.
///
/// Malformed input never causes an error. Instead, the decoder writes one
/// [`REPLACEMENT`] character for each rejected sequence and continues with
/// the next byte. The byte that caused the rejection is consumed by the
/// rejection. It is *not* reconsidered as the start of a new sequence, so that
/// `"\xe2A"` decodes to `"\u{fffd}"` and not `"\u{fffd}A"`.
///
/// # Example
///
/// ```
/// # use prettyutf::Utf8Decoder;
/// let mut decoder = Utf8Decoder::new();
/// let mut output = [0; 8];
///
/// // The euro sign straddles both chunks.
/// let count = decoder.decode(b"A\xe2\x82", &mut output);
/// assert_eq!(count, 1);
/// assert!(decoder.is_pending());
///
/// let count = decoder.decode(b"\xac", &mut output[count..]);
/// assert_eq!(count, 1);
/// assert_eq!(&output[..2], &[0x41, 0x20ac]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Utf8Decoder {
    /// The automaton state, which is never the reject state between calls.
    state: u8,
    /// The bits of the code point decoded so far.
    code_point: u32,
}

impl Default for Utf8Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Utf8Decoder {
    /// Create a new decoder in the start state.
    pub const fn new() -> Self {
        Self {
            state: UTF8_ACCEPT,
            code_point: 0,
        }
    }

    /// Discard any incomplete sequence and return to the start state.
    pub fn reset(&mut self) {
        self.state = UTF8_ACCEPT;
        self.code_point = 0;
    }

    /// Determine whether this decoder is in the middle of a multi-byte
    /// sequence.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.state != UTF8_ACCEPT
    }

    /// Determine the maximum number of code units decoding the given number of
    /// bytes may produce.
    ///
    /// Bytes decode to at most one code unit each, with one exception: when a
    /// four-byte sequence is pending, its final byte produces a surrogate pair.
    #[inline]
    pub fn max_decoded_len(&self, byte_len: usize) -> usize {
        if self.is_pending() {
            byte_len.saturating_add(1)
        } else {
            byte_len
        }
    }

    /// Decode the bytes into the output and return the number of code units
    /// written.
    ///
    /// To resume decoding at some offset into a larger output buffer, pass the
    /// corresponding subslice, i.e., `&mut buffer[offset..]`.
    ///
    /// # Panics
    ///
    /// If the output is shorter than the code units decoded from the input.
    /// An output with at least [`Utf8Decoder::max_decoded_len`] units never is.
    pub fn decode(&mut self, input: &[u8], output: &mut [u16]) -> usize {
        let mut index = 0;

        for &byte in input {
            if byte < 0x80 && self.state == UTF8_ACCEPT {
                output[index] = byte as u16;
                index += 1;
                continue;
            }

            match step(self.state, &mut self.code_point, byte) {
                UTF8_ACCEPT => {
                    index += write_code_point(self.code_point, &mut output[index..]);
                    self.reset();
                }
                UTF8_REJECT => {
                    output[index] = REPLACEMENT;
                    index += 1;
                    self.reset();
                }
                state => self.state = state,
            }
        }

        index
    }

    /// Finish decoding the stream and return the number of code units written.
    ///
    /// If the stream ended in the middle of a sequence, this method writes one
    /// [`REPLACEMENT`] character. In either case, the decoder is ready for a
    /// new stream afterwards.
    ///
    /// # Panics
    ///
    /// If a sequence is pending and the output is empty.
    pub fn finish(&mut self, output: &mut [u16]) -> usize {
        if self.is_pending() {
            output[0] = REPLACEMENT;
            self.reset();
            1
        } else {
            0
        }
    }
}

/// Decode the bytes as one complete stream.
///
/// Incomplete sequences at the end of the bytes are treated like any other
/// malformed sequence.
pub fn decode(bytes: &[u8]) -> Vec<u16> {
    let mut decoder = Utf8Decoder::new();
    let mut output = vec![0; bytes.len()];
    let mut count = decoder.decode(bytes, &mut output);
    count += decoder.finish(&mut output[count..]);
    output.truncate(count);
    output
}

// ================================================================================================
