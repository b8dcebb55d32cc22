//! Enriched output file.
//!
//! Rows are appended one at a time and the file is closed after each write, so
//! an interrupted run keeps everything written so far and another process can
//! tail the file while the run is in progress.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::domain::{ChamberProfile, OutputRow};
use crate::error::AppError;

pub struct OutputFile {
    path: PathBuf,
    header: Vec<&'static str>,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>, profile: &ChamberProfile) -> Self {
        Self {
            path: path.into(),
            header: profile.output_header(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the file and write only the header.
    pub fn start_fresh(&self) -> Result<(), AppError> {
        let file = File::create(&self.path).map_err(|e| {
            AppError::io(format!("Failed to create output '{}': {e}", self.path.display()))
        })?;
        self.write(file, &self.header)
    }

    /// Prepare for appending. A file that does not exist yet gets a header.
    pub fn resume(&self) -> Result<(), AppError> {
        if self.path.exists() {
            Ok(())
        } else {
            self.start_fresh()
        }
    }

    /// Append one row and close the file again.
    pub fn append(&self, row: &OutputRow) -> Result<(), AppError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                AppError::io(format!("Failed to open output '{}': {e}", self.path.display()))
            })?;
        self.write(file, &row.values)
    }

    fn write<I, S>(&self, file: File, fields: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer
            .write_record(fields)
            .map_err(|e| AppError::io(format!("Failed to write '{}': {e}", self.path.display())))?;
        writer
            .flush()
            .map_err(|e| AppError::io(format!("Failed to flush '{}': {e}", self.path.display())))
    }
}
