//! Helper module with the options for reading UTF-8 streams.
//!
//! This module provides the options for a [`Utf8Reader`](crate::Utf8Reader)
//! and the corresponding builder.
//!
//!
//! # Example
//!
//! ```
//! # use prettyutf::opt::{Options, Volume};
//! let options = Options::builder()
//!     .read_buffer_size(1_024)
//!     .replace_truncated(false)
//!     .build();
//!
//! assert_eq!(options.read_buffer_size(), 1_024);
//! assert!(!options.replace_truncated());
//! assert_eq!(options.volume(), Volume::Silent);
//! ```

/// The diagnostic logging volume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Volume {
    /// No diagnostics.
    #[default]
    Silent,
    /// One line per read from the byte source.
    Regular,
    /// Additionally, one line per decoded chunk and end of stream.
    Detailed,
}

/// The smallest supported read buffer size.
///
/// It guarantees that a single read can complete even the longest UTF-8
/// sequence.
pub const MIN_READ_BUFFER_SIZE: usize = 4;

#[derive(Clone, Debug)]
struct OptionData {
    volume: Volume,
    read_buffer_size: usize,
    replace_truncated: bool,
}

impl OptionData {
    pub const fn new() -> Self {
        Self {
            volume: Volume::Silent,
            read_buffer_size: 8_192,
            replace_truncated: true,
        }
    }
}

/// A builder of options objects.
#[derive(Debug)]
pub struct OptionBuilder(OptionData);

impl OptionBuilder {
    /// Set the volume.
    pub fn volume(&mut self, volume: Volume) -> &mut Self {
        self.0.volume = volume;
        self
    }

    /// Set the read buffer size.
    ///
    /// This method ensures that the size is at least
    /// [`MIN_READ_BUFFER_SIZE`], updating it if necessary.
    pub fn read_buffer_size(&mut self, size: usize) -> &mut Self {
        self.0.read_buffer_size = size.max(MIN_READ_BUFFER_SIZE);
        self
    }

    /// Set whether a sequence cut off by the end of the stream turns into a
    /// replacement character.
    pub fn replace_truncated(&mut self, replace: bool) -> &mut Self {
        self.0.replace_truncated = replace;
        self
    }

    /// Instantiate the options.
    pub fn build(&self) -> Options {
        Options(self.0.clone())
    }
}

/// An options object.
#[derive(Clone, Debug)]
pub struct Options(OptionData);

impl Default for Options {
    fn default() -> Self {
        Options(OptionData::new())
    }
}

impl Options {
    /// Create a new builder with the default option values.
    pub fn builder() -> OptionBuilder {
        OptionBuilder(OptionData::new())
    }

    /// Instantiate the default options but with regular debugging output
    /// enabled.
    pub fn with_log() -> Options {
        Self::builder().volume(Volume::Regular).build()
    }

    /// Instantiate the default options but with detailed debugging output
    /// enabled.
    pub fn with_detailed_log() -> Options {
        Self::builder().volume(Volume::Detailed).build()
    }

    /// Get the volume.
    pub fn volume(&self) -> Volume {
        self.0.volume
    }

    /// Determine whether the volume is regular or detailed.
    pub fn verbose(&self) -> bool {
        Volume::Regular <= self.0.volume
    }

    /// Get the size of the read buffer.
    pub fn read_buffer_size(&self) -> usize {
        self.0.read_buffer_size
    }

    /// Determine whether a sequence cut off by the end of the stream turns
    /// into a replacement character.
    pub fn replace_truncated(&self) -> bool {
        self.0.replace_truncated
    }
}

// ================================================================================================

#[cfg(test)]
mod test {
    use super::{Options, Volume, MIN_READ_BUFFER_SIZE};

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.volume(), Volume::Silent);
        assert!(!options.verbose());
        assert_eq!(options.read_buffer_size(), 8_192);
        assert!(options.replace_truncated());
    }

    #[test]
    fn test_builder() {
        let options = Options::builder().read_buffer_size(1).build();
        assert_eq!(options.read_buffer_size(), MIN_READ_BUFFER_SIZE);

        assert!(Options::with_log().verbose());
        assert_eq!(Options::with_detailed_log().volume(), Volume::Detailed);
    }
}
