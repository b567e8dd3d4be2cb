//! Single-stream HTTP downloader.
//!
//! Probes the size with HEAD, then streams one GET straight into the part file
//! and the progress sink from the curl write callback.

use crate::config::HttpConfig;
use crate::error::FetchError;
use crate::fetch_head;
use crate::progress::{DownloadOutcome, ProgressSink};
use crate::storage::PartFile;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Downloads `url` to `destination`, reporting progress to `progress`.
///
/// The size probe runs before the destination is touched, so a missing or
/// malformed `Content-Length` fails without creating any file. Any failure
/// after that removes the part file. Blocking; see [`download_http_task`].
pub fn download_http(
    url: &str,
    destination: &Path,
    http: &HttpConfig,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<DownloadOutcome, FetchError> {
    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }

    let head = fetch_head::probe(url, http)?;
    let total = head.total_size()?;
    tracing::info!(url, total, destination = %destination.display(), "starting HTTP download");

    let mut part = PartFile::create(destination)?;
    tracing::debug!(part = %part.temp_path().display(), "writing part file");
    let mut write_error: Option<FetchError> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(http.max_redirections)?;
    easy.useragent(&http.user_agent)?;
    easy.connect_timeout(http.connect_timeout())?;
    easy.low_speed_limit(http.low_speed_limit_bytes)?;
    easy.low_speed_time(http.low_speed_time())?;
    easy.progress(true)?;

    progress.start(total);
    let start = Instant::now();
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if cancel.is_cancelled() {
                return Ok(0);
            }
            match part.write_chunk(data) {
                Ok(()) => {
                    progress.advance(data.len() as u64);
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        // Polled by libcurl even while no data arrives; false aborts.
        transfer.progress_function(|_, _, _, _| !cancel.is_cancelled())?;
        transfer.perform()
    };

    if let Some(e) = write_error {
        return Err(e);
    }
    if let Err(e) = performed {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        return Err(e.into());
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http {
            method: "GET",
            url: url.to_string(),
            status: code,
        });
    }

    let received = part.written();
    if received != total {
        return Err(FetchError::PartialTransfer {
            expected: total,
            received,
        });
    }
    let elapsed = start.elapsed();
    let path = part.finalize()?;
    progress.finish();

    tracing::info!(url, bytes = total, elapsed_ms = elapsed.as_millis() as u64, "HTTP download complete");
    Ok(DownloadOutcome {
        path,
        bytes: total,
        elapsed,
    })
}

/// Runs [`download_http`] on the blocking pool.
pub async fn download_http_task(
    url: String,
    destination: PathBuf,
    http: HttpConfig,
    progress: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
) -> Result<DownloadOutcome, FetchError> {
    tokio::task::spawn_blocking(move || {
        download_http(&url, &destination, &http, progress.as_ref(), &cancel)
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;

    #[test]
    fn cancelled_before_start_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = download_http(
            "http://127.0.0.1:9/out.bin",
            &dest,
            &HttpConfig::default(),
            &NoProgress,
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::Cancelled));
        assert!(!dest.exists());
    }

    #[test]
    fn unreachable_host_is_network_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        let http = HttpConfig {
            connect_timeout_secs: 2,
            ..HttpConfig::default()
        };
        // Port 9 (discard) is closed on loopback in test environments.
        let err = download_http(
            "http://127.0.0.1:9/out.bin",
            &dest,
            &http,
            &NoProgress,
            &CancellationToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "{err}");
        assert!(!dest.exists());
    }
}
