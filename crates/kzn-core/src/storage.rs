//! Part-file storage for a single sequential download.
//!
//! Bytes go to `<destination>.part`; `finalize` renames it onto the destination.
//! A writer dropped without `finalize` removes its part file, so a failed or
//! cancelled transfer leaves nothing behind.

use crate::error::FetchError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const BUF_SIZE: usize = 64 * 1024;

/// Path of the temp file used while downloading `destination`.
pub fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}

pub struct PartFile {
    writer: Option<BufWriter<File>>,
    temp_path: PathBuf,
    destination: PathBuf,
    written: u64,
}

impl PartFile {
    /// Create (or truncate) the part file next to `destination`.
    pub fn create(destination: &Path) -> Result<Self, FetchError> {
        let temp_path = part_path(destination);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| FetchError::storage(&temp_path, e))?;
        Ok(PartFile {
            writer: Some(BufWriter::with_capacity(BUF_SIZE, file)),
            temp_path,
            destination: destination.to_path_buf(),
            written: 0,
        })
    }

    /// Append `data` at the current end of the part file.
    pub fn write_chunk(&mut self, data: &[u8]) -> Result<(), FetchError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| FetchError::storage(&self.temp_path, closed()))?;
        writer
            .write_all(data)
            .map_err(|e| FetchError::storage(&self.temp_path, e))?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Bytes written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Flush, sync and rename onto the destination. Returns the destination path.
    pub fn finalize(mut self) -> Result<PathBuf, FetchError> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| FetchError::storage(&self.temp_path, closed()))?;
        let file = writer
            .into_inner()
            .map_err(|e| FetchError::storage(&self.temp_path, e.into_error()))?;
        file.sync_all()
            .map_err(|e| FetchError::storage(&self.temp_path, e))?;
        drop(file);

        std::fs::rename(&self.temp_path, &self.destination)
            .map_err(|e| FetchError::storage(&self.destination, e))?;
        // Renamed: nothing left for Drop to clean up.
        self.temp_path = PathBuf::new();
        Ok(self.destination.clone())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        self.writer.take();
        if self.temp_path.as_os_str().is_empty() {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.temp_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("failed to remove {}: {}", self.temp_path.display(), e);
            }
        }
    }
}

fn closed() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, "part file already closed")
}
