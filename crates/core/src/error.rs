//! Error types for HTML to PowerPoint conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input file exists but could not be read as UTF-8 text.
    #[error("Failed to read input file {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input could not be interpreted as markup at all.
    #[error("HTML parsing error: {0}")]
    ParseError(String),

    /// The output file could not be created or written.
    #[error("Failed to write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing or parsing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// A presentation package is missing required parts.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),
}

impl Error {
    /// Classify an I/O failure that happened while reading the input file.
    pub fn from_input_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::InputNotFound(path)
        } else {
            Error::InputUnreadable { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_missing_input_is_not_found() {
        let err = Error::from_input_io("deck.html", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, Error::InputNotFound(ref p) if p == &PathBuf::from("deck.html")));
        assert_eq!(err.to_string(), "Input file not found: deck.html");
    }

    #[test]
    fn test_other_input_failures_are_unreadable() {
        let err = Error::from_input_io(
            "deck.html",
            io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"),
        );
        assert!(matches!(err, Error::InputUnreadable { .. }));
        assert!(err.to_string().contains("valid UTF-8"));
    }
}
