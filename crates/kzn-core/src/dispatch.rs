//! Routes a download request to the HTTP, torrent or metalink strategy.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::KznConfig;
use crate::error::FetchError;
use crate::http::download_http_task;
use crate::metalink::download_metalink_task;
use crate::progress::{DownloadOutcome, ProgressSink};
use crate::torrent::{download_with_rqbit, TorrentSource};
use crate::url_model::derive_filename;

/// A URI plus an optional output path. Immutable once dispatch begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub uri: String,
    pub output: Option<PathBuf>,
}

impl DownloadRequest {
    pub fn new(uri: impl Into<String>, output: Option<PathBuf>) -> Self {
        Self {
            uri: uri.into(),
            output,
        }
    }
}

/// How a request will be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Torrent(TorrentSource),
    Metalink(PathBuf),
    Http { url: String, output: PathBuf },
}

/// Classifies `request` by prefix/suffix.
///
/// `magnet:` or `.torrent` → torrent, `.metalink` → metalink (suffixes are
/// case-insensitive), anything else → HTTP. The output path only applies to
/// HTTP; without one the URL's last path segment is used.
pub fn classify(request: &DownloadRequest) -> Strategy {
    let uri = request.uri.as_str();
    let lower = uri.to_ascii_lowercase();
    if uri.starts_with("magnet:") || lower.ends_with(".torrent") {
        Strategy::Torrent(TorrentSource::from_uri(uri))
    } else if lower.ends_with(".metalink") {
        Strategy::Metalink(PathBuf::from(uri))
    } else {
        let output = request
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(derive_filename(uri)));
        Strategy::Http {
            url: uri.to_string(),
            output,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Ok,
    Err,
}

impl fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` honors the width flags of the results table.
        match self {
            DownloadStatus::Ok => f.pad("OK"),
            DownloadStatus::Err => f.pad("ERR"),
        }
    }
}

/// Summary of one invocation, printed by the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadResult {
    /// Destination on success; the planned destination (HTTP) or the input URI otherwise.
    pub path: String,
    /// Formatted average speed; empty on failure.
    pub speed: String,
    pub status: DownloadStatus,
    pub error: Option<String>,
}

impl DownloadResult {
    pub fn is_ok(&self) -> bool {
        self.status == DownloadStatus::Ok
    }
}

/// Everything a strategy needs besides the request.
#[derive(Clone)]
pub struct FetchContext {
    pub config: KznConfig,
    /// Torrent root, metalink destination, and base for relative HTTP outputs.
    pub work_dir: PathBuf,
    pub progress: Arc<dyn ProgressSink>,
    pub cancel: CancellationToken,
}

/// Runs the strategy for `request` and summarizes the outcome. Never fails:
/// errors end up in the result's status and message.
pub async fn dispatch(request: &DownloadRequest, ctx: &FetchContext) -> DownloadResult {
    let strategy = classify(request);
    tracing::info!(uri = %request.uri, ?strategy, "dispatching download");

    let fallback_path = match &strategy {
        Strategy::Http { output, .. } => ctx.work_dir.join(output).display().to_string(),
        _ => request.uri.clone(),
    };

    match run_strategy(strategy, ctx).await {
        Ok(outcome) => {
            tracing::info!(
                path = %outcome.path.display(),
                bytes = outcome.bytes,
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "download finished"
            );
            DownloadResult {
                path: outcome.path.display().to_string(),
                speed: outcome.speed(),
                status: DownloadStatus::Ok,
                error: None,
            }
        }
        Err(e) => {
            tracing::error!(uri = %request.uri, error = %e, "download failed");
            DownloadResult {
                path: fallback_path,
                speed: String::new(),
                status: DownloadStatus::Err,
                error: Some(e.to_string()),
            }
        }
    }
}

async fn run_strategy(
    strategy: Strategy,
    ctx: &FetchContext,
) -> Result<DownloadOutcome, FetchError> {
    match strategy {
        Strategy::Http { url, output } => {
            download_http_task(
                url,
                ctx.work_dir.join(output),
                ctx.config.http.clone(),
                Arc::clone(&ctx.progress),
                ctx.cancel.clone(),
            )
            .await
        }
        Strategy::Metalink(path) => {
            download_metalink_task(
                ctx.work_dir.join(path),
                ctx.work_dir.clone(),
                ctx.config.http.clone(),
                Arc::clone(&ctx.progress),
                ctx.cancel.clone(),
            )
            .await
        }
        Strategy::Torrent(source) => {
            download_with_rqbit(
                &source,
                &ctx.work_dir,
                &ctx.config.torrent,
                ctx.progress.as_ref(),
                &ctx.cancel,
            )
            .await
        }
    }
}
