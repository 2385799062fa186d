//! Session lifecycle and rotation.
//!
//! A session is one continuous span of telemetry persisted to a single
//! output file. The router is a two-state machine (`Idle` until the first
//! telemetry record, then `Active`) and the only rotation trigger is a
//! timestamp regression: the firmware resets its millisecond clock on every
//! run, so a smaller timestamp means a new run began. Metadata and noise
//! never rotate.
//!
//! Session file names derive from local creation time
//! (`stm32_log_YYYYMMDD_HHMMSS.csv`). Rapid rotation within one second is
//! disambiguated with a `_2`, `_3`, ... suffix; `create_new` makes the
//! existence check and the create one atomic step.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use mm_common::schema::LOG_FILE_PREFIX;
use mm_common::{Error, Result};

use crate::writer::SessionWriter;

/// Attempt bound for same-second name disambiguation.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// One active capture session: exclusive file handle plus the bookkeeping
/// the router and the metadata propagator need.
#[derive(Debug)]
pub struct Session {
    writer: SessionWriter,
    /// Timestamp of the last telemetry record accepted into this file.
    last_timestamp_ms: u64,
    /// Exact text of the column-schema line already written to this file.
    pub(crate) materialized_schema: Option<String>,
    /// How many firmware-meta entries (in first-seen order) are in this file.
    pub(crate) fw_meta_written: usize,
}

impl Session {
    fn create(save_dir: &Path, now: DateTime<Local>, first_timestamp_ms: u64) -> Result<Self> {
        let stem = format!("{}{}", LOG_FILE_PREFIX, now.format("%Y%m%d_%H%M%S"));
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{stem}.csv")
            } else {
                format!("{stem}_{}.csv", attempt + 1)
            };
            let path = save_dir.join(name);
            match SessionWriter::create_new(&path) {
                Ok(writer) => {
                    return Ok(Self {
                        writer,
                        last_timestamp_ms: first_timestamp_ms,
                        materialized_schema: None,
                        fw_meta_written: 0,
                    })
                }
                Err(Error::SessionCreate { source, .. })
                    if source.kind() == std::io::ErrorKind::AlreadyExists =>
                {
                    continue
                }
                Err(err) => return Err(err),
            }
        }
        Err(Error::SessionCreate {
            path: save_dir.join(format!("{stem}.csv")),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "exhausted session name suffixes",
            ),
        })
    }

    /// Append one metadata line (schema or firmware meta) verbatim.
    pub fn append_metadata(&mut self, line: &str) -> Result<()> {
        self.writer.append_line(line)
    }

    /// Append one telemetry line and advance the rotation watermark.
    pub fn append_telemetry(&mut self, csv_line: &str, timestamp_ms: u64) -> Result<()> {
        self.writer.append_line(csv_line)?;
        self.last_timestamp_ms = timestamp_ms;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.writer.path()
    }

    pub fn last_timestamp_ms(&self) -> u64 {
        self.last_timestamp_ms
    }
}

/// Decides which session receives each telemetry record.
///
/// `Idle` until the first record arrives; thereafter exactly one session is
/// active at a time. A superseded session is simply dropped: every line was
/// flushed on write, so no close action is needed.
#[derive(Debug)]
pub struct SessionRouter {
    save_dir: PathBuf,
    active: Option<Session>,
}

impl SessionRouter {
    pub fn new(save_dir: PathBuf) -> Self {
        Self {
            save_dir,
            active: None,
        }
    }

    /// The session that must receive a record with this timestamp, creating
    /// or rotating first when required. The `bool` is true when this call
    /// opened a fresh session (the caller flushes pending metadata into it
    /// before writing the record).
    pub fn session_for(&mut self, timestamp_ms: u64) -> Result<(&mut Session, bool)> {
        match self.active.take() {
            Some(session) if timestamp_ms >= session.last_timestamp_ms() => {
                Ok((self.active.insert(session), false))
            }
            // Idle, or the timestamp regressed: the superseded session (if
            // any) is dropped here; every line it holds was already flushed.
            _ => {
                let session = Session::create(&self.save_dir, Local::now(), timestamp_ms)?;
                Ok((self.active.insert(session), true))
            }
        }
    }

    /// Currently active session, if the router has left `Idle`.
    pub fn active_mut(&mut self) -> Option<&mut Session> {
        self.active.as_mut()
    }
}
