pub mod config;
pub mod logging;

pub mod checksum;
pub mod dispatch;
pub mod error;
pub mod fetch_head;
pub mod http;
pub mod metalink;
pub mod progress;
pub mod speed;
pub mod storage;
pub mod torrent;
pub mod url_model;

pub use dispatch::{dispatch, DownloadRequest, DownloadResult, DownloadStatus, FetchContext};
pub use error::FetchError;
