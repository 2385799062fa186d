//! Error types for the micromouse host tools.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for host-tool operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the host tools.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unsupported baud rate: {baud}")]
    UnsupportedBaud { baud: u32 },

    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Device errors (20-29)
    #[error("serial device not found: {0}")]
    DeviceNotFound(String),

    #[error("cannot open serial device {path}: {source}")]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serial device read failed: {source}")]
    DeviceRead {
        #[source]
        source: std::io::Error,
    },

    // Session errors (30-39)
    #[error("cannot create session file {path}: {source}")]
    SessionCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write to session file {path} failed: {source}")]
    SessionWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns the stable numeric code for this error type.
    /// Used for detailed error reporting on the diagnostic sink.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::UnsupportedBaud { .. } => 11,
            Error::OutputDir { .. } => 12,
            Error::DeviceNotFound(_) => 20,
            Error::DeviceOpen { .. } => 21,
            Error::DeviceRead { .. } => 22,
            Error::SessionCreate { .. } => 30,
            Error::SessionWrite { .. } => 31,
            Error::Io(_) => 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_band_grouping() {
        assert_eq!(Error::Config("x".into()).code(), 10);
        assert_eq!(Error::UnsupportedBaud { baud: 300 }.code(), 11);
        assert_eq!(Error::DeviceNotFound("auto".into()).code(), 20);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(Error::Io(io).code(), 60);
    }

    #[test]
    fn display_includes_context() {
        let err = Error::UnsupportedBaud { baud: 1234 };
        assert_eq!(err.to_string(), "unsupported baud rate: 1234");
    }
}
