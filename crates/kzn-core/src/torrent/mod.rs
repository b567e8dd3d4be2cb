//! Torrent strategy (magnet links and `.torrent` files).
//!
//! The engine does the peer-to-peer work; this module adds the resource,
//! waits for metadata, then waits for the engine's completion signal while
//! sampling its byte counter for the progress bar. Both waits are bounded and
//! abort as soon as the cancellation token fires.

mod rqbit;

pub use rqbit::RqbitEngine;

use crate::config::TorrentConfig;
use crate::error::FetchError;
use crate::progress::{DownloadOutcome, ProgressSink};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// What to add to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TorrentSource {
    Magnet(String),
    File(PathBuf),
}

impl TorrentSource {
    /// `magnet:` URIs are magnets; anything else is a path to a `.torrent` file.
    pub fn from_uri(uri: &str) -> Self {
        if uri.starts_with("magnet:") {
            TorrentSource::Magnet(uri.to_string())
        } else {
            TorrentSource::File(PathBuf::from(uri))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentFile {
    /// Path relative to [`TorrentLayout::output_dir`].
    pub relative_path: PathBuf,
    pub length: u64,
}

/// File layout, known once metadata has been fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TorrentLayout {
    /// Directory the engine writes this torrent's files under.
    pub output_dir: PathBuf,
    pub total_bytes: u64,
    pub files: Vec<TorrentFile>,
}

/// A torrent engine rooted at some output directory.
#[allow(async_fn_in_trait)]
pub trait TorrentEngine {
    type Handle: TorrentHandle;

    /// Add the resource; all files are selected for download.
    async fn add(&self, source: &TorrentSource) -> Result<Self::Handle, FetchError>;
}

/// A torrent that was added to an engine.
#[allow(async_fn_in_trait)]
pub trait TorrentHandle {
    /// Resolves once piece/file layout is available.
    async fn wait_for_metadata(&self) -> Result<TorrentLayout, FetchError>;

    /// Resolves once every selected piece is downloaded and verified.
    async fn wait_until_complete(&self) -> Result<(), FetchError>;

    /// Bytes downloaded so far. May jump backwards if the engine re-checks pieces.
    fn bytes_completed(&self) -> u64;
}

/// Adds `source` to `engine` and waits for it to finish.
///
/// Returns the first file of the torrent, in the engine's layout, with the
/// average throughput over the download wait. Other files are downloaded as well.
///
/// Adding the source and fetching its metadata share one `metadata_timeout`
/// deadline: engines may resolve a magnet inside `add`.
pub async fn download_torrent<E: TorrentEngine>(
    engine: &E,
    source: &TorrentSource,
    opts: &TorrentConfig,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<DownloadOutcome, FetchError> {
    let resolve = async {
        let handle = engine.add(source).await?;
        let layout = handle.wait_for_metadata().await?;
        Ok::<_, FetchError>((handle, layout))
    };
    let (handle, layout) = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(FetchError::Cancelled),
        waited = tokio::time::timeout(opts.metadata_timeout(), resolve) => {
            waited.map_err(|_| FetchError::Timeout { stage: "metadata" })??
        }
    };
    let first = layout
        .files
        .first()
        .ok_or_else(|| FetchError::Torrent("torrent has no files".to_string()))?;
    tracing::info!(
        total = layout.total_bytes,
        files = layout.files.len(),
        output_dir = %layout.output_dir.display(),
        first = %first.relative_path.display(),
        "torrent metadata received"
    );

    progress.start(layout.total_bytes);
    let start = Instant::now();
    let completion = handle.wait_until_complete();
    tokio::pin!(completion);
    let deadline = tokio::time::sleep(opts.completion_timeout());
    tokio::pin!(deadline);
    let mut ticker = tokio::time::interval(opts.progress_interval());
    let mut shown = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            done = &mut completion => {
                done?;
                break;
            }
            _ = &mut deadline => return Err(FetchError::Timeout { stage: "download" }),
            _ = ticker.tick() => {
                // Keep the bar monotonic even if the engine's counter steps back.
                shown = shown.max(handle.bytes_completed().min(layout.total_bytes));
                progress.set_position(shown);
            }
        }
    }
    let elapsed = start.elapsed();
    progress.set_position(layout.total_bytes);
    progress.finish();

    if layout.files.len() > 1 {
        tracing::info!(
            others = layout.files.len() - 1,
            "multi-file torrent; reporting the first file only"
        );
    }
    Ok(DownloadOutcome {
        path: layout.output_dir.join(&first.relative_path),
        bytes: layout.total_bytes,
        elapsed,
    })
}

/// Starts a librqbit session rooted at `root` and downloads `source` with it.
pub async fn download_with_rqbit(
    source: &TorrentSource,
    root: &Path,
    opts: &TorrentConfig,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<DownloadOutcome, FetchError> {
    let engine = RqbitEngine::open(root).await?;
    download_torrent(&engine, source, opts, progress, cancel).await
}
