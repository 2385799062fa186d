//! Serial telemetry capture for the micromouse firmware.
//!
//! Reads the firmware's line-oriented UART stream, classifies each line
//! (column schema, firmware metadata, telemetry, noise), and persists
//! telemetry into rotating session files. Rotation is driven by timestamp
//! regression — the firmware restarts its millisecond clock each run — and
//! every session file carries the current column schema plus all firmware
//! metadata seen so far, exactly once each.
//!
//! The data path is `framer` → `classify` → (`session`, `propagate`,
//! `writer`, `echo`), orchestrated by `capture`; `device` produces the byte
//! source and `cli`/`exit_codes` form the binary surface.

pub mod capture;
pub mod classify;
pub mod cli;
pub mod device;
pub mod echo;
pub mod exit_codes;
pub mod framer;
pub mod propagate;
pub mod session;
pub mod writer;

pub use capture::{run_capture, CapturePipeline, CaptureStats};
pub use classify::{classify, Category, TelemetryRecord};
pub use echo::{ConsoleEcho, EchoSink};
pub use exit_codes::ExitCode;
pub use framer::LineFramer;
pub use propagate::PropagatorState;
pub use session::{Session, SessionRouter};
pub use writer::SessionWriter;
