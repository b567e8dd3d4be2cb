//! Metalink strategy: read an XML descriptor, pick the first mirror of the first
//! file and hand it to the HTTP downloader.

mod model;

pub use model::{Metalink, MetalinkFile, MetalinkHash, MetalinkSource, MetalinkUrl};

use crate::checksum::verify_sha256;
use crate::config::HttpConfig;
use crate::error::{FetchError, MetalinkError};
use crate::http::download_http;
use crate::progress::{DownloadOutcome, ProgressSink};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Parse a metalink document. Unknown elements and attributes are ignored.
pub fn parse_metalink(xml: &str) -> Result<Metalink, MetalinkError> {
    Ok(quick_xml::de::from_str(xml)?)
}

/// Reads and parses the descriptor at `path`.
pub fn read_metalink(path: &Path) -> Result<Metalink, FetchError> {
    let xml = std::fs::read_to_string(path).map_err(|e| FetchError::storage(path, e))?;
    Ok(parse_metalink(&xml)?)
}

/// Downloads the resource described by the metalink file at `path` into `dest_dir`.
///
/// When the file entry carries a SHA-256 hash the result is verified; on
/// mismatch the downloaded file is removed.
pub fn download_metalink(
    path: &Path,
    dest_dir: &Path,
    http: &HttpConfig,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<DownloadOutcome, FetchError> {
    let metalink = read_metalink(path)?;
    let source = metalink.select_source()?;
    tracing::info!(
        metalink = %path.display(),
        url = %source.url,
        mirrors = metalink.files[0].urls.len(),
        "selected metalink source"
    );

    let destination = dest_dir.join(&source.filename);
    let outcome = download_http(&source.url, &destination, http, progress, cancel)?;

    if let Some(expected) = source.sha256.as_deref() {
        if let Err(e) = verify_sha256(&outcome.path, expected) {
            if let Err(rm) = std::fs::remove_file(&outcome.path) {
                tracing::warn!("failed to remove {}: {}", outcome.path.display(), rm);
            }
            return Err(e);
        }
        tracing::debug!(path = %outcome.path.display(), "sha-256 verified");
    }
    Ok(outcome)
}

/// Runs [`download_metalink`] on the blocking pool.
pub async fn download_metalink_task(
    path: PathBuf,
    dest_dir: PathBuf,
    http: HttpConfig,
    progress: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
) -> Result<DownloadOutcome, FetchError> {
    tokio::task::spawn_blocking(move || {
        download_metalink(&path, &dest_dir, &http, progress.as_ref(), &cancel)
    })
    .await?
}
