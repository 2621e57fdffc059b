//! Helper module with this crate's error type.
//!
//! Decoding itself never fails: malformed UTF-8 turns into replacement
//! characters. Errors only arise when reading through a
//! [`Utf8Reader`](crate::Utf8Reader), which may have been closed or whose
//! byte source may fail. They seamlessly convert to and from I/O errors.

/// The enumeration of error kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The reader has been closed.
    Closed,
    /// An error reading from the byte source.
    Unreadable,
}

impl ErrorKind {
    /// Turn the error kind to an error message.
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Closed => "stream is closed",
            Self::Unreadable => "I/O failure reading byte source",
        }
    }
}

impl From<ErrorKind> for std::io::Error {
    fn from(value: ErrorKind) -> Self {
        Error::from(value).into()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error { kind, source: None }
    }
}

/// A reader error.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: Option<std::io::Error>,
}

impl Error {
    /// Create a new unreadable error.
    pub fn unreadable(source: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Unreadable,
            source: Some(source),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind.as_str())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|error| error as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::unreadable(value)
    }
}

impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        match value.kind {
            ErrorKind::Closed => Self::new(std::io::ErrorKind::NotConnected, value),
            ErrorKind::Unreadable => {
                if let Some(error) = value.source {
                    error
                } else {
                    Self::new(std::io::ErrorKind::Other, value)
                }
            }
        }
    }
}

/// Render the error, including any sources, as a multi-line report.
pub fn report<E: std::error::Error>(error: &E) -> String {
    let mut report = format!("ERROR: {}", error);

    let mut error: &dyn std::error::Error = error;
    while let Some(inner) = error.source() {
        report.push_str("\n    ");
        report.push_str(&inner.to_string());
        error = inner;
    }

    report
}

// ================================================================================================

#[cfg(test)]
mod test {
    use super::{report, Error, ErrorKind};
    use std::error::Error as _;

    #[test]
    fn test_closed() {
        let error = Error::from(ErrorKind::Closed);
        assert_eq!(error.kind(), ErrorKind::Closed);
        assert_eq!(error.to_string(), "stream is closed");
        assert!(error.source().is_none());

        let error: std::io::Error = error.into();
        assert_eq!(error.kind(), std::io::ErrorKind::NotConnected);
        assert_eq!(error.to_string(), "stream is closed");
    }

    #[test]
    fn test_unreadable() {
        let cause = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe burst");
        let error = Error::from(cause);
        assert_eq!(error.kind(), ErrorKind::Unreadable);
        assert_eq!(error.to_string(), "I/O failure reading byte source");
        assert_eq!(
            error.source().map(|e| e.to_string()),
            Some("pipe burst".to_string())
        );
        assert_eq!(
            report(&error),
            "ERROR: I/O failure reading byte source\n    pipe burst"
        );

        // Converting back restores the original error.
        let error: std::io::Error = error.into();
        assert_eq!(error.kind(), std::io::ErrorKind::BrokenPipe);
        assert_eq!(error.to_string(), "pipe burst");

        let error: std::io::Error = ErrorKind::Unreadable.into();
        assert_eq!(error.kind(), std::io::ErrorKind::Other);
    }
}
