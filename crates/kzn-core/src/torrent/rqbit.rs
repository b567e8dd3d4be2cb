//! librqbit-backed torrent engine.

use std::path::Path;
use std::sync::Arc;

use librqbit::{AddTorrent, AddTorrentOptions, AddTorrentResponse, ManagedTorrent, Session};

use super::{TorrentEngine, TorrentFile, TorrentHandle, TorrentLayout, TorrentSource};
use crate::error::FetchError;

/// A librqbit session writing under one output directory.
pub struct RqbitEngine {
    session: Arc<Session>,
}

impl RqbitEngine {
    /// Starts a session (listener, DHT) rooted at `root`.
    pub async fn open(root: &Path) -> Result<Self, FetchError> {
        let session = Session::new(root.to_path_buf())
            .await
            .map_err(|e| FetchError::TorrentInit(format!("{e:#}")))?;
        tracing::debug!(root = %root.display(), "torrent session started");
        Ok(RqbitEngine { session })
    }
}

impl TorrentEngine for RqbitEngine {
    type Handle = RqbitHandle;

    async fn add(&self, source: &TorrentSource) -> Result<RqbitHandle, FetchError> {
        let add = match source {
            TorrentSource::Magnet(uri) => AddTorrent::from_url(uri.as_str()),
            TorrentSource::File(path) => AddTorrent::from_local_filename(&path.to_string_lossy())
                .map_err(|e| FetchError::TorrentAdd(format!("{}: {e:#}", path.display())))?,
        };
        // No output_folder: the session root plus the engine's per-torrent subfolder.
        let opts = AddTorrentOptions {
            overwrite: true,
            ..Default::default()
        };
        let response = self
            .session
            .add_torrent(add, Some(opts))
            .await
            .map_err(|e| FetchError::TorrentAdd(format!("{e:#}")))?;
        let handle = match response {
            AddTorrentResponse::Added(_, handle) => handle,
            AddTorrentResponse::AlreadyManaged(_, handle) => handle,
            AddTorrentResponse::ListOnly(_) => {
                return Err(FetchError::TorrentAdd(
                    "engine returned a list-only response".to_string(),
                ))
            }
        };
        Ok(RqbitHandle { handle })
    }
}

pub struct RqbitHandle {
    handle: Arc<ManagedTorrent>,
}

impl TorrentHandle for RqbitHandle {
    async fn wait_for_metadata(&self) -> Result<TorrentLayout, FetchError> {
        self.handle
            .wait_until_initialized()
            .await
            .map_err(|e| FetchError::Torrent(format!("{e:#}")))?;
        let files = self
            .handle
            .with_metadata(|meta| {
                meta.file_infos
                    .iter()
                    .map(|f| TorrentFile {
                        relative_path: f.relative_filename.clone(),
                        length: f.len,
                    })
                    .collect::<Vec<_>>()
            })
            .map_err(|e| FetchError::Torrent(format!("{e:#}")))?;
        let total_bytes = files.iter().map(|f| f.length).sum();
        let output_dir = self.handle.output_folder().to_path_buf();
        Ok(TorrentLayout {
            output_dir,
            total_bytes,
            files,
        })
    }

    async fn wait_until_complete(&self) -> Result<(), FetchError> {
        self.handle
            .wait_until_completed()
            .await
            .map_err(|e| FetchError::Torrent(format!("{e:#}")))
    }

    fn bytes_completed(&self) -> u64 {
        self.handle.stats().progress_bytes
    }
}
