//! The capture pipeline and its blocking event loop.
//!
//! Single-threaded by design: one execution context owns the framer, the
//! metadata propagator, the session router, and the echo sink, so no part
//! needs locking. `CapturePipeline::feed` is the whole data path — tests
//! drive it directly with byte chunks; the binary wraps it in `run_capture`
//! around a blocking device read with a bounded timeout.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::info;

use mm_common::{Error, Result};

use crate::classify::{classify, Category};
use crate::echo::EchoSink;
use crate::framer::LineFramer;
use crate::propagate::PropagatorState;
use crate::session::SessionRouter;

/// Device read buffer size, matching a full USB CDC-ACM burst comfortably.
const READ_CHUNK_BYTES: usize = 4096;

/// Counters reported at shutdown.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CaptureStats {
    /// Session files opened (initial plus rotations).
    pub sessions_opened: u64,
    /// Telemetry records written and echoed.
    pub telemetry_lines: u64,
    /// Lines classified as noise.
    pub noise_lines: u64,
    /// Distinct firmware-meta lines seen.
    pub fw_meta_seen: u64,
    /// Column-schema lines observed (including repeats).
    pub schema_lines: u64,
    /// Oversized un-terminated lines discarded by the framer.
    pub oversize_dropped: u64,
}

/// Everything downstream of the byte source, as one synchronous unit.
pub struct CapturePipeline<E: EchoSink> {
    framer: LineFramer,
    propagator: PropagatorState,
    router: SessionRouter,
    echo: E,
    show_noise: bool,
    stats: CaptureStats,
}

impl<E: EchoSink> CapturePipeline<E> {
    pub fn new(save_dir: std::path::PathBuf, echo: E, show_noise: bool) -> Self {
        Self {
            framer: LineFramer::new(),
            propagator: PropagatorState::new(),
            router: SessionRouter::new(save_dir),
            echo,
            show_noise,
            stats: CaptureStats::default(),
        }
    }

    /// Process one chunk of raw bytes: frame, classify, route, persist,
    /// echo. Everything happens before this returns.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        self.framer.feed(chunk);
        while let Some(line) = self.framer.next_line() {
            self.handle_line(&line)?;
        }
        self.stats.oversize_dropped = self.framer.oversize_dropped();
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<()> {
        match classify(line) {
            Category::ColumnSchema { raw, columns } => {
                self.stats.schema_lines += 1;
                self.propagator.observe_schema(raw, columns);
                // Metadata arriving mid-session is appended immediately.
                if let Some(session) = self.router.active_mut() {
                    self.propagator.materialize(session)?;
                }
            }
            Category::FirmwareMeta { raw } => {
                self.propagator.observe_fw_meta(raw);
                self.stats.fw_meta_seen = self.propagator.fw_meta_count() as u64;
                if let Some(session) = self.router.active_mut() {
                    self.propagator.materialize(session)?;
                }
            }
            Category::Telemetry(record) => {
                let (session, fresh) = self.router.session_for(record.timestamp_ms)?;
                if fresh {
                    self.stats.sessions_opened += 1;
                    info!(path = %session.path().display(), "new capture file");
                }
                // Pending metadata lands before the triggering record.
                self.propagator.materialize(session)?;
                session.append_telemetry(&record.as_csv_line(), record.timestamp_ms)?;
                self.stats.telemetry_lines += 1;
                self.echo.telemetry(&record.as_csv_line());
            }
            Category::Noise { raw } => {
                self.stats.noise_lines += 1;
                if self.show_noise {
                    self.echo.noise(&raw);
                }
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> &CaptureStats {
        &self.stats
    }

    /// Consume the pipeline and hand back its echo sink (tests inspect it).
    pub fn into_echo(self) -> E {
        self.echo
    }

    /// Shutdown summary as a JSON payload for the diagnostic sink.
    pub fn summary_json(&self) -> String {
        serde_json::to_string(&self.stats).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Drive the pipeline from a blocking byte-readable device handle until the
/// stop flag is raised or the device fails.
///
/// The handle's read timeout is the loop's only blocking point; a timeout or
/// a zero-byte read just re-checks the stop flag. Any other read failure is
/// a hard stop — the device is assumed disconnected — surfaced as
/// `Error::DeviceRead` after everything already accepted has been flushed.
pub fn run_capture<E: EchoSink>(
    reader: &mut dyn Read,
    pipeline: &mut CapturePipeline<E>,
    stop: &AtomicBool,
) -> Result<()> {
    let mut buf = [0u8; READ_CHUNK_BYTES];
    while !stop.load(Ordering::Relaxed) {
        match reader.read(&mut buf) {
            Ok(0) => continue,
            Ok(n) => pipeline.feed(&buf[..n])?,
            Err(e)
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::TimedOut
                        | std::io::ErrorKind::WouldBlock
                        | std::io::ErrorKind::Interrupted
                ) =>
            {
                continue
            }
            Err(e) => return Err(Error::DeviceRead { source: e }),
        }
    }
    Ok(())
}
