//! Exit codes for the mm-capture CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//! Operator cancellation (Ctrl+C) is not an error and exits `Clean`.

use mm_common::Error;

/// Exit codes for capture runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Capture finished cleanly (stopped by the operator).
    Clean = 0,

    /// Configuration error: bad baud rate, unusable output directory.
    ConfigError = 10,

    /// Device error: port missing, open failed, or read failed mid-capture.
    DeviceError = 11,

    /// Session file I/O error (create or write failed).
    IoError = 13,

    /// Internal/unknown error.
    InternalError = 99,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates an error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::Config(_) | Error::UnsupportedBaud { .. } | Error::OutputDir { .. } => {
                ExitCode::ConfigError
            }
            Error::DeviceNotFound(_) | Error::DeviceOpen { .. } | Error::DeviceRead { .. } => {
                ExitCode::DeviceError
            }
            Error::SessionCreate { .. } | Error::SessionWrite { .. } | Error::Io(_) => {
                ExitCode::IoError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_is_zero_and_not_error() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert!(!ExitCode::Clean.is_error());
        assert!(ExitCode::DeviceError.is_error());
    }

    #[test]
    fn error_mapping_follows_taxonomy() {
        assert_eq!(
            ExitCode::from(&Error::UnsupportedBaud { baud: 300 }),
            ExitCode::ConfigError
        );
        assert_eq!(
            ExitCode::from(&Error::DeviceNotFound("auto".into())),
            ExitCode::DeviceError
        );
        let io = std::io::Error::new(std::io::ErrorKind::Other, "x");
        assert_eq!(ExitCode::from(&Error::Io(io)), ExitCode::IoError);
    }
}
