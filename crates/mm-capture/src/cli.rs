//! Command-line surface and configuration resolution.
//!
//! Resolution order for the output directory: positional argument, then the
//! `MICROMOUSE_LOG_DIR` environment variable, then a platform default
//! (`~/Documents/micromouse_logs` on macOS, `~/micromouse_logs` elsewhere).

use std::path::PathBuf;

use clap::Parser;

/// Capture line-oriented telemetry from the robot's serial port into
/// rotating CSV session files.
#[derive(Parser, Debug)]
#[command(name = "mm-capture", version, about)]
pub struct Cli {
    /// Directory for capture session files
    /// [default: $MICROMOUSE_LOG_DIR or ~/micromouse_logs]
    pub save_dir: Option<PathBuf>,

    /// Serial device path, or "auto" to pick the first USB UART
    #[arg(default_value = "auto")]
    pub port: String,

    /// Baud rate (must be one of the supported rates)
    #[arg(default_value_t = 115_200)]
    pub baud: u32,

    /// Echo non-telemetry lines to stderr for diagnosis
    #[arg(long)]
    pub show_noise: bool,
}

/// Fallback output directory when none is given on the command line.
pub fn default_save_dir() -> PathBuf {
    if let Ok(env) = std::env::var("MICROMOUSE_LOG_DIR") {
        if !env.is_empty() {
            return PathBuf::from(env);
        }
    }

    if cfg!(target_os = "macos") {
        if let Some(docs) = dirs::document_dir() {
            return docs.join("micromouse_logs");
        }
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("micromouse_logs")
}

impl Cli {
    /// Resolved output directory.
    pub fn save_dir(&self) -> PathBuf {
        self.save_dir.clone().unwrap_or_else(default_save_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["mm-capture"]);
        assert_eq!(cli.port, "auto");
        assert_eq!(cli.baud, 115_200);
        assert!(!cli.show_noise);
        assert!(cli.save_dir.is_none());
    }

    #[test]
    fn positional_overrides() {
        let cli = Cli::parse_from(["mm-capture", "/tmp/logs", "/dev/ttyACM1", "921600"]);
        assert_eq!(cli.save_dir(), PathBuf::from("/tmp/logs"));
        assert_eq!(cli.port, "/dev/ttyACM1");
        assert_eq!(cli.baud, 921_600);
    }

    #[test]
    fn show_noise_flag() {
        let cli = Cli::parse_from(["mm-capture", "--show-noise"]);
        assert!(cli.show_noise);
    }
}
