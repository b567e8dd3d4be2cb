//! Error taxonomy shared by every download strategy.

use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single download strategy. Returned unwrapped to the dispatcher,
/// which records the message in the download result.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (DNS, connect, timeout, reset, ...).
    #[error("network: {0}")]
    Network(#[from] curl::Error),

    /// HEAD or GET returned a non-2xx status.
    #[error("{method} {url} returned HTTP {status}")]
    Http {
        method: &'static str,
        url: String,
        status: u32,
    },

    /// The metadata probe carried no `Content-Length`.
    #[error("server did not report Content-Length")]
    MissingContentLength,

    /// The metadata probe carried a `Content-Length` that is not a byte count.
    #[error("invalid Content-Length: {0:?}")]
    InvalidContentLength(String),

    /// Transfer finished with fewer (or more) bytes than the probe announced.
    #[error("partial transfer: expected {expected} bytes, got {received}")]
    PartialTransfer { expected: u64, received: u64 },

    /// Destination could not be created, written, read or renamed.
    #[error("storage: {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("metalink: {0}")]
    Metalink(#[from] MetalinkError),

    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("torrent engine failed to start: {0}")]
    TorrentInit(String),

    #[error("failed to add torrent: {0}")]
    TorrentAdd(String),

    /// Engine error after the torrent was added.
    #[error("torrent: {0}")]
    Torrent(String),

    #[error("timed out waiting for torrent {stage}")]
    Timeout { stage: &'static str },

    #[error("download cancelled")]
    Cancelled,

    /// The blocking transfer task panicked or was aborted.
    #[error("download task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl FetchError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Storage {
            path: path.into(),
            source,
        }
    }
}

/// Metalink descriptor problems.
#[derive(Debug, Error)]
pub enum MetalinkError {
    #[error("malformed document: {0}")]
    Malformed(#[from] quick_xml::de::DeError),

    /// No `file` entry, or the first `file` entry has no `url`.
    #[error("no URLs in metalink")]
    NoUrl,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_names_method_and_status() {
        let err = FetchError::Http {
            method: "HEAD",
            url: "http://example.com/x".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HEAD http://example.com/x returned HTTP 404");
    }

    #[test]
    fn metalink_error_is_wrapped() {
        let err: FetchError = MetalinkError::NoUrl.into();
        assert_eq!(err.to_string(), "metalink: no URLs in metalink");
    }
}
