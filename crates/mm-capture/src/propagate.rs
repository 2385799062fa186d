//! Metadata propagation across session files.
//!
//! The firmware announces its column schema and build metadata once (or
//! occasionally) per run, but every session file must be self-describing:
//! the current schema and all firmware-meta lines seen so far belong in
//! every file, exactly once each, before or interleaved with its telemetry.
//!
//! The propagator owns the process-wide view (latest schema, ordered
//! first-seen firmware meta); each `Session` remembers what has already been
//! materialized into *its* file, so `materialize` is idempotent and cheap to
//! call before every telemetry write.

use tracing::info;

use crate::session::Session;
use mm_common::Result;

/// Accumulated metadata awaiting materialization into session files.
#[derive(Debug, Default)]
pub struct PropagatorState {
    /// Most recent column-schema line, verbatim. Later lines supersede.
    latest_schema: Option<String>,
    /// Every distinct firmware-meta line, in first-seen order.
    fw_meta: Vec<String>,
}

impl PropagatorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a column-schema line. Supersedes any previous schema; an exact
    /// repeat of the current one is a no-op.
    pub fn observe_schema(&mut self, raw: String, columns: Vec<String>) {
        if self.latest_schema.as_deref() == Some(raw.as_str()) {
            return;
        }
        info!(columns = columns.join(",").as_str(), "column schema");
        self.latest_schema = Some(raw);
    }

    /// Record a firmware-meta line. Duplicates of an already-seen exact
    /// value are ignored; new values append in first-seen order.
    pub fn observe_fw_meta(&mut self, raw: String) {
        if self.fw_meta.iter().any(|m| *m == raw) {
            return;
        }
        info!(meta = raw.as_str(), "firmware metadata");
        self.fw_meta.push(raw);
    }

    /// Write everything this session's file is still missing: unseen
    /// firmware-meta entries in first-seen order, then the current schema if
    /// its exact text is not already in the file. Idempotent.
    pub fn materialize(&self, session: &mut Session) -> Result<()> {
        while session.fw_meta_written < self.fw_meta.len() {
            let line = &self.fw_meta[session.fw_meta_written];
            session.append_metadata(line)?;
            session.fw_meta_written += 1;
        }
        if let Some(schema) = &self.latest_schema {
            if session.materialized_schema.as_deref() != Some(schema.as_str()) {
                session.append_metadata(schema)?;
                session.materialized_schema = Some(schema.clone());
            }
        }
        Ok(())
    }

    /// Latest schema line, if one has been seen.
    pub fn latest_schema(&self) -> Option<&str> {
        self.latest_schema.as_deref()
    }

    /// Number of distinct firmware-meta lines seen.
    pub fn fw_meta_count(&self) -> usize {
        self.fw_meta.len()
    }
}
