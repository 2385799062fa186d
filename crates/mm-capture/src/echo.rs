//! Live visibility sinks.
//!
//! Accepted telemetry is echoed to a primary sink (stdout) in the same
//! textual form as written to the session file; noise goes to a diagnostic
//! sink (stderr) only when the operator opts in. Echoing is best-effort and
//! never gates or aborts file persistence.

use std::io::Write;

/// Destination for live line output.
pub trait EchoSink {
    /// One accepted telemetry record, normalized comma-joined form.
    fn telemetry(&mut self, line: &str);
    /// One noise line, shown only when noise display is enabled.
    fn noise(&mut self, line: &str);
}

/// Console sink: telemetry on stdout, noise on stderr.
///
/// Write failures (e.g. a closed pipe on the display side) are ignored;
/// losing the live view must not stop the capture.
#[derive(Debug, Default)]
pub struct ConsoleEcho;

impl EchoSink for ConsoleEcho {
    fn telemetry(&mut self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
    }

    fn noise(&mut self, line: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{line}");
    }
}
