//! # GUI Event Log
//!
//! Appends GUI input transitions to a JSONL (JSON Lines) file, one object per
//! line:
//!
//! ```text
//! {"timestamp":"2026-01-01T12:00:00.000+01:00","has_gamepad":true}
//! {"timestamp":"2026-01-01T12:00:01.250+01:00","key":"FaceDown","down":true,"value":1.0}
//! ```

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::gamepad::layout::GamepadKey;

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Record {
    Key {
        timestamp: DateTime<Local>,
        key: GamepadKey,
        down: bool,
        value: f32,
    },
    Capability {
        timestamp: DateTime<Local>,
        has_gamepad: bool,
    },
}

/// JSONL writer for GUI input transitions.
#[derive(Debug)]
pub struct EventLog {
    writer: BufWriter<File>,
    path: PathBuf,
    records: u64,
}

impl EventLog {
    /// Opens `path` for appending, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
            records: 0,
        })
    }

    /// Path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records written since the log was opened.
    #[must_use]
    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn record_key(&mut self, key: GamepadKey, down: bool, value: f32) -> Result<()> {
        self.write(&Record::Key {
            timestamp: Local::now(),
            key,
            down,
            value,
        })
    }

    pub fn record_capability(&mut self, has_gamepad: bool) -> Result<()> {
        self.write(&Record::Capability {
            timestamp: Local::now(),
            has_gamepad,
        })
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn write(&mut self, record: &Record) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }
}

impl Drop for EventLog {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
