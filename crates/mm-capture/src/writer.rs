//! Append-only session file writer.
//!
//! One writer exclusively owns the file handle of the active session. The
//! file is opened once at rotation with `create_new` (which doubles as the
//! collision check for time-derived names) and every appended line is
//! flushed immediately, so any exit path leaves the file readable and
//! complete up to the last accepted line.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use mm_common::{Error, Result};

/// Exclusive append handle for one session file.
#[derive(Debug)]
pub struct SessionWriter {
    path: PathBuf,
    file: File,
}

impl SessionWriter {
    /// Create the session file. Fails with `AlreadyExists` (surfaced inside
    /// `Error::SessionCreate`) if a file of the same name is present, which
    /// the router uses to disambiguate same-second rotations.
    pub fn create_new(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create_new(true)
            .append(true)
            .open(path)
            .map_err(|source| Error::SessionCreate {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Append one line, newline-terminated, and flush it to disk.
    pub fn append_line(&mut self, line: &str) -> Result<()> {
        let write = |file: &mut File| -> std::io::Result<()> {
            file.write_all(line.as_bytes())?;
            file.write_all(b"\n")?;
            file.flush()
        };
        write(&mut self.file).map_err(|source| Error::SessionWrite {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
