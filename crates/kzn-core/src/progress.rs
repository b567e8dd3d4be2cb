//! Progress reporting and transfer outcome.
//!
//! Strategies push byte counts into a [`ProgressSink`]; the CLI renders them as a
//! progress bar. The finished transfer is summarized by [`DownloadOutcome`].

use std::path::PathBuf;
use std::time::Duration;

use crate::speed::{average_rate, format_speed};

/// Receives progress events from a running download. Must be cheap: HTTP calls
/// `advance` from the curl write callback for every received chunk.
pub trait ProgressSink: Send + Sync {
    /// Total size became known.
    fn start(&self, total_bytes: u64);
    /// `bytes` more were transferred.
    fn advance(&self, bytes: u64);
    /// Absolute position (torrent counters are sampled, not streamed).
    fn set_position(&self, bytes: u64);
    fn finish(&self);
}

/// Sink that discards everything (tests, non-interactive use).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn start(&self, _total_bytes: u64) {}
    fn advance(&self, _bytes: u64) {}
    fn set_position(&self, _bytes: u64) {}
    fn finish(&self) {}
}

/// A completed transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadOutcome {
    /// Where the content landed (first file for torrents).
    pub path: PathBuf,
    /// Total bytes of the resource.
    pub bytes: u64,
    /// Time from transfer start to completion.
    pub elapsed: Duration,
}

impl DownloadOutcome {
    pub fn bytes_per_sec(&self) -> f64 {
        average_rate(self.bytes, self.elapsed)
    }

    /// Average throughput formatted for the results table.
    pub fn speed(&self) -> String {
        format_speed(self.bytes_per_sec())
    }
}
